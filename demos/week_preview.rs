// demos/week_preview.rs
use forecast_csv::{FetchConfig, ForecastError, Pipeline, UnitGroup};

#[tokio::main]
async fn main() -> Result<(), ForecastError> {
    // Set RUST_LOG=info (or debug) to see request and retry messages
    env_logger::init();

    let Ok(api_key) = std::env::var("VISUAL_CROSSING_API_KEY") else {
        eprintln!("Set VISUAL_CROSSING_API_KEY to run this demo.");
        return Ok(());
    };

    let config = FetchConfig::builder()
        .location("Istanbul,Turkey")
        .unit_group(UnitGroup::Metric)
        .hot_threshold(28.0)
        .time_zone("Europe/Istanbul")
        .build();

    let pipeline = Pipeline::with_defaults()?;
    let outlooks = pipeline
        .fetch_outlooks(&config, &api_key, chrono::Utc::now())
        .await?;

    println!(
        "Week of {} to {} in {}:",
        outlooks.window.tomorrow, outlooks.window.week_end, config.location
    );
    for row in outlooks.week.rows()? {
        println!(
            "{:<10} {:<10} max {:>5} rain {:>5} hot={} rainy={}",
            row.date,
            row.day.unwrap_or_default(),
            row.tmax.map_or("-".to_string(), |t| format!("{t:.1}")),
            row.prcp.map_or("-".to_string(), |p| format!("{p:.1}")),
            row.is_hot,
            row.is_rainy,
        );
    }

    Ok(())
}
