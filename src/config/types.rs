use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, UsagebillError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for `*.json` data files
    pub data_dir: PathBuf,
    /// Prefix for currency columns in table output
    pub currency_symbol: String,
    /// Use forecast prices unless overridden on the command line
    pub default_forecast: bool,
    /// Show "No price" / "Incomplete price" instead of zero costs
    pub show_price_notes: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        super::ConfigLoader::load()
    }

    pub fn save(&self) -> Result<()> {
        super::ConfigLoader::save(self)
    }

    /// Write the default config file if none exists
    pub fn init() -> Result<()> {
        let path = super::ConfigLoader::config_path();
        if path.exists() {
            println!("Config already exists: {}", path.display());
            return Ok(());
        }
        Config::default().save()?;
        println!("Created config file: {}", path.display());
        Ok(())
    }

    pub fn print(&self) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| UsagebillError::Config(e.to_string()))?;
        println!("{}", content);
        Ok(())
    }

    pub fn check(&self) -> Result<()> {
        if self.currency_symbol.is_empty() {
            return Err(UsagebillError::Config(
                "currency_symbol must not be empty".to_string(),
            ));
        }
        if !self.data_dir.is_dir() {
            return Err(UsagebillError::Config(format!(
                "data_dir {} is not a directory",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}
