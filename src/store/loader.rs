use glob::glob;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::Dataset;
use crate::error::{Result, UsagebillError};
use crate::model::{DailyUsage, UsagePrice, UsageType, Venture, Warehouse};

/// One data file. Every section is optional so fixtures can be split
/// across files (entities in one, daily usage dumps in others).
#[derive(Debug, Default, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub ventures: Vec<Venture>,
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
    #[serde(default)]
    pub usage_types: Vec<UsageType>,
    #[serde(default)]
    pub usage_prices: Vec<UsagePrice>,
    #[serde(default)]
    pub daily_usages: Vec<DailyUsage>,
}

impl Dataset {
    /// Load and merge all `*.json` files under a data directory
    pub fn load(dir: &Path) -> Result<Self> {
        let mut dataset = Dataset::new();
        let mut files = 0usize;

        let pattern = format!("{}/**/*.json", dir.display());
        if let Ok(paths) = glob(&pattern) {
            for path in paths.flatten() {
                dataset.merge(load_file(&path)?);
                files += 1;
                debug!(path = %path.display(), "data file loaded");
            }
        }

        if files == 0 {
            return Err(UsagebillError::EmptyDataDir(dir.to_path_buf()));
        }

        dataset.validate()?;
        debug!(
            files,
            ventures = dataset.ventures.len(),
            usage_types = dataset.usage_types.len(),
            prices = dataset.usage_prices.len(),
            daily_usages = dataset.daily_usages.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    fn merge(&mut self, file: DataFile) {
        self.ventures.extend(file.ventures);
        self.warehouses.extend(file.warehouses);
        self.usage_types.extend(file.usage_types);
        self.usage_prices.extend(file.usage_prices);
        self.daily_usages.extend(file.daily_usages);
    }
}

fn load_file(path: &Path) -> Result<DataFile> {
    let content = fs::read_to_string(path).map_err(|source| UsagebillError::DataRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| UsagebillError::DataParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ENTITIES: &str = r#"{
        "ventures": [{"id": 1, "name": "Alpha", "symbol": "alpha"}],
        "warehouses": [{"id": 1, "name": "North"}],
        "usage_types": [
            {"id": 10, "name": "Power", "symbol": "power", "by_warehouse": true}
        ]
    }"#;

    const USAGES: &str = r#"{
        "usage_prices": [
            {
                "usage_type": 10,
                "start": "2024-01-01",
                "end": "2024-01-31",
                "price": "1.50",
                "warehouse": 1
            }
        ],
        "daily_usages": [
            {"date": "2024-01-05", "venture": 1, "usage_type": 10, "warehouse": 1, "value": 12.5}
        ]
    }"#;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "entities.json", ENTITIES);
        write_file(dir.path(), "usages.json", USAGES);

        let dataset = Dataset::load(dir.path()).unwrap();
        assert_eq!(dataset.ventures.len(), 1);
        assert_eq!(dataset.usage_types.len(), 1);
        assert_eq!(dataset.usage_prices.len(), 1);
        assert_eq!(dataset.daily_usages.len(), 1);

        // Optional fields get their defaults
        assert!(dataset.warehouses[0].show_in_report);
        assert!(dataset.usage_types[0].by_warehouse);
        assert!(!dataset.usage_types[0].by_cost);
    }

    #[test]
    fn test_load_empty_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Dataset::load(dir.path()),
            Err(UsagebillError::EmptyDataDir(_))
        ));
    }

    #[test]
    fn test_load_rejects_broken_reference() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "entities.json", ENTITIES);
        write_file(
            dir.path(),
            "bad.json",
            r#"{"daily_usages": [{"date": "2024-01-05", "venture": 7, "usage_type": 10, "value": 1.0}]}"#,
        );

        assert!(matches!(
            Dataset::load(dir.path()),
            Err(UsagebillError::BrokenReference { .. })
        ));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "bad.json", "{ not json");
        assert!(matches!(
            Dataset::load(dir.path()),
            Err(UsagebillError::DataParse { .. })
        ));
    }
}
