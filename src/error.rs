use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UsagebillError>;

#[derive(Debug, Error)]
pub enum UsagebillError {
    #[error("failed to read {path}: {source}")]
    DataRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no data files found in {0}")]
    EmptyDataDir(PathBuf),

    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: &'static str, id: u32 },

    #[error("{entity} {id} references unknown {referenced} {referenced_id}")]
    BrokenReference {
        entity: &'static str,
        id: u32,
        referenced: &'static str,
        referenced_id: u32,
    },

    #[error("unknown {entity} '{symbol}'")]
    UnknownSymbol { entity: &'static str, symbol: String },

    #[error("unknown report plugin '{0}'")]
    UnknownPlugin(String),

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
