//! forecast-csv
//!
//! Fetches tomorrow's and the coming week's daily weather and writes
//! `yarin.csv` and `week.csv` into the output directory.

use anyhow::{bail, Context, Result};
use clap::Parser;
use forecast_csv::{
    ClientSettings, FetchConfig, MissingKeyPolicy, Pipeline, RetryPolicy, RunOutcome, UnitGroup,
    WeatherClient, DEFAULT_BASE_URL, DEFAULT_HOT_THRESHOLD, DEFAULT_LOCATION, DEFAULT_OUTPUT_DIR,
    DEFAULT_TIMEOUT_SECS, DEFAULT_TIME_ZONE,
};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

const API_KEY_VAR: &str = "VISUAL_CROSSING_API_KEY";
const PREVIEW_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "forecast-csv")]
#[command(author, version, about = "Fetch daily weather for tomorrow and the next week into CSV files", long_about = None)]
struct Cli {
    /// Directory receiving yarin.csv and week.csv
    #[arg(long, env = "CRIME_DATA_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    outdir: PathBuf,

    /// Location as understood by the weather API, e.g. "San Francisco,CA"
    #[arg(long, env = "WX_LOCATION", default_value = DEFAULT_LOCATION)]
    location: String,

    /// Unit group: metric, us, uk or base
    #[arg(long, env = "WX_UNIT", default_value = "metric")]
    unit: UnitGroup,

    /// Days with tmax at or above this value are flagged hot (same units as --unit)
    #[arg(long, env = "HOT_THRESHOLD_C", default_value_t = DEFAULT_HOT_THRESHOLD)]
    hot_threshold: f64,

    /// IANA time zone whose midnight defines "tomorrow"
    #[arg(long, env = "WX_TZ", default_value = DEFAULT_TIME_ZONE)]
    tz: String,

    /// Fail instead of writing header-only files when no API key is set
    #[arg(long)]
    no_placeholder: bool,

    /// Override the timeline endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::builder()
            .location(self.location.clone())
            .unit_group(self.unit)
            .hot_threshold(self.hot_threshold)
            .time_zone(self.tz.clone())
            .output_dir(self.outdir.clone())
            .on_missing_key(if self.no_placeholder {
                MissingKeyPolicy::Fail
            } else {
                MissingKeyPolicy::WritePlaceholder
            })
            .build()
    }

    fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryPolicy::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.fetch_config();
    let api_key = std::env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty());

    if cli.print_config {
        let mut resolved = serde_json::to_value(&config)?;
        resolved["has_api_key"] = serde_json::Value::Bool(api_key.is_some());
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    if api_key.is_none() && config.on_missing_key == MissingKeyPolicy::Fail {
        bail!("{API_KEY_VAR} is not set and --no-placeholder was given");
    }

    let client = WeatherClient::new(cli.client_settings()).context("Invalid client settings")?;
    let pipeline = Pipeline::new(client);
    info!("Running for '{}' ({})", config.location, config.unit_group);

    let outcome = pipeline
        .run(&config, api_key.as_deref())
        .await
        .context("Weather run failed")?;

    match &outcome {
        RunOutcome::Fetched { outlooks, .. } => {
            println!(
                "Window: {} (tomorrow) to {}",
                outlooks.window.tomorrow, outlooks.window.week_end
            );
            for (path, outlook) in outcome.paths().iter().zip([&outlooks.tomorrow, &outlooks.week]) {
                println!("Saved {} ({} rows)", path.display(), outlook.height());
                println!("{}", outlook.head(PREVIEW_ROWS));
            }
        }
        RunOutcome::Placeholder { .. } => {
            println!("{API_KEY_VAR} is not set; wrote header-only placeholder files:");
            for path in outcome.paths() {
                println!("  {}", path.display());
            }
        }
    }

    Ok(())
}
