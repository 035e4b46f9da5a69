use super::types::Config;
use std::path::PathBuf;

impl Default for Config {
    fn default() -> Self {
        let data_dir = std::env::var("USAGEBILL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        Config {
            data_dir,
            currency_symbol: "$".to_string(),
            default_forecast: false,
            show_price_notes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.currency_symbol, "$");
        assert!(!config.default_forecast);
        assert!(config.show_price_notes);
    }
}
