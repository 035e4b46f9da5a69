use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "usagebill")]
#[command(version, about = "Per-venture usage and cost reporting")]
pub struct Cli {
    /// Initialize config file
    #[arg(long = "init")]
    pub init: bool,

    /// Print current configuration
    #[arg(long = "print")]
    pub print: bool,

    /// Check configuration
    #[arg(long = "check")]
    pub check: bool,

    /// Data directory (overrides config)
    #[arg(long = "data", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Report start date (inclusive)
    #[arg(long = "start", value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    /// Report end date (inclusive)
    #[arg(long = "end", value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Use forecast prices instead of actual prices (overrides config)
    #[arg(
        long = "forecast",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub forecast: Option<bool>,

    /// Show "No price" / "Incomplete price" instead of numeric costs
    /// (overrides config)
    #[arg(
        long = "no-price-msg",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub no_price_msg: Option<bool>,

    /// Restrict the report to one usage type
    #[arg(long = "usage-type", value_name = "SYMBOL")]
    pub usage_type: Option<String>,

    /// Restrict the report to these ventures (repeatable)
    #[arg(long = "venture", value_name = "SYMBOL")]
    pub ventures: Vec<String>,

    /// Report plugin to run
    #[arg(long = "plugin", value_name = "NAME", default_value = "usage")]
    pub plugin: String,

    /// Print the grand total per usage type instead of the row table
    #[arg(long = "total")]
    pub total: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Forecast pricing for this run: the flag wins over the config default
    pub fn use_forecast(&self, config_default: bool) -> bool {
        self.forecast.unwrap_or(config_default)
    }

    /// Price-note display for this run: the flag wins over the config default
    pub fn price_notes(&self, config_default: bool) -> bool {
        self.no_price_msg.unwrap_or(config_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_price_msg_flag_overrides_config() {
        let cli = Cli::try_parse_from(["usagebill", "--no-price-msg"]).unwrap();
        assert_eq!(cli.no_price_msg, Some(true));
        assert!(cli.price_notes(false));

        let cli = Cli::try_parse_from(["usagebill", "--no-price-msg=false"]).unwrap();
        assert!(!cli.price_notes(true));

        // Without the flag the config value stands
        let cli = Cli::try_parse_from(["usagebill"]).unwrap();
        assert_eq!(cli.no_price_msg, None);
        assert!(cli.price_notes(true));
        assert!(!cli.price_notes(false));
    }

    #[test]
    fn test_forecast_flag_overrides_config() {
        let cli = Cli::try_parse_from(["usagebill", "--forecast"]).unwrap();
        assert!(cli.use_forecast(false));

        let cli = Cli::try_parse_from(["usagebill", "--forecast=false"]).unwrap();
        assert!(!cli.use_forecast(true));

        let cli = Cli::try_parse_from(["usagebill"]).unwrap();
        assert!(cli.use_forecast(true));
        assert!(!cli.use_forecast(false));
    }
}
