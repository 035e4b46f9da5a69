use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use usagebill::cli::{Cli, OutputFormat};
use usagebill::config::Config;
use usagebill::error::UsagebillError;
use usagebill::model::UsageType;
use usagebill::output;
use usagebill::report::{ReportRegistry, ReportRows, Schema};
use usagebill::store::Dataset;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("USAGEBILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    // Handle configuration commands
    if cli.init {
        Config::init()?;
        return Ok(());
    }

    if cli.print {
        let config = Config::load().unwrap_or_default();
        config.print()?;
        return Ok(());
    }

    if cli.check {
        let config = Config::load()?;
        config.check()?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_default();
    if let Some(data_dir) = &cli.data {
        config.data_dir = data_dir.clone();
    }
    let forecast = cli.use_forecast(config.default_forecast);
    let price_notes = cli.price_notes(config.show_price_notes);

    let (start, end) = report_window(&cli)?;
    let data = Dataset::load(&config.data_dir)?;

    // Resolve symbols up front so typos fail before any aggregation runs
    let venture_ids = venture_filter(&data, &cli.ventures)?;
    let usage_types = selected_usage_types(&data, cli.usage_type.as_deref())?;

    let registry = ReportRegistry::new();
    let plugin = registry
        .get(&cli.plugin, &data)
        .ok_or_else(|| UsagebillError::UnknownPlugin(cli.plugin.clone()))?;

    if cli.total {
        for ut in &usage_types {
            let total = plugin.total_cost(start, end, venture_ids.as_deref(), ut, forecast);
            println!("{}: {}{}", ut.name, config.currency_symbol, total.round_dp(2));
        }
        return Ok(());
    }

    let mut schema = Schema::new();
    let mut rows = ReportRows::new();
    for ut in &usage_types {
        schema.extend(plugin.schema(ut));
        let ut_rows = plugin.usages(start, end, venture_ids.as_deref(), ut, forecast, price_notes);
        for (venture, columns) in ut_rows {
            rows.entry(venture).or_default().extend(columns);
        }
    }

    match cli.format {
        OutputFormat::Table => {
            println!("{}", output::render_table(&data, &schema, &rows, &config.currency_symbol))
        }
        OutputFormat::Json => println!("{}", output::render_json(&data, &rows)?),
    }

    Ok(())
}

fn report_window(cli: &Cli) -> Result<(NaiveDate, NaiveDate), UsagebillError> {
    let (start, end) = match (cli.start, cli.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(UsagebillError::Config(
                "--start and --end are required for reports".to_string(),
            ))
        }
    };
    if start > end {
        return Err(UsagebillError::InvalidRange { start, end });
    }
    Ok((start, end))
}

fn venture_filter(data: &Dataset, symbols: &[String]) -> Result<Option<Vec<u32>>, UsagebillError> {
    if symbols.is_empty() {
        return Ok(None);
    }
    let mut ids = Vec::new();
    for symbol in symbols {
        ids.push(data.venture_by_symbol(symbol)?.id);
    }
    Ok(Some(ids))
}

fn selected_usage_types<'a>(
    data: &'a Dataset,
    symbol: Option<&str>,
) -> Result<Vec<&'a UsageType>, UsagebillError> {
    match symbol {
        Some(symbol) => Ok(vec![data.usage_type_by_symbol(symbol)?]),
        None => Ok(data.report_usage_types()),
    }
}
