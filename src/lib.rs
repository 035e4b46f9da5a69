pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod report;
pub mod store;

pub use error::{Result, UsagebillError};
