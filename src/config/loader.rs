use std::fs;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::{Result, UsagebillError};

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load() -> Result<Config> {
        Self::load_from_path(Self::config_path())
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(config: &Config) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(config).map_err(|e| UsagebillError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Config file location (~/.config/usagebill/config.toml)
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("usagebill").join("config.toml")
        } else {
            PathBuf::from(".usagebill.toml")
        }
    }
}
