mod config;
mod error;
mod frames;
mod output;
mod pipeline;
mod types;
mod weather_data;

pub use config::*;
pub use error::ForecastError;
pub use pipeline::outlook_cache::{CacheKey, OutlookCache, DEFAULT_CACHE_TTL};
pub use pipeline::{Outlooks, Pipeline, RunOutcome};

pub use frames::daily_outlook::DailyOutlook;
pub use frames::transform::{transform, weather_rows_to_frame};
pub use output::csv_writer::{write_outlook, write_placeholder};

pub use types::date_window::{DateRange, DateWindow, WEEK_DAYS};
pub use types::rows::{
    output_header, EnrichedRow, OutputKind, WeatherRow, OUTPUT_COLUMNS, REQUIRED_SOURCE_COLUMNS,
};
pub use types::unit_group::UnitGroup;
pub use types::weekday::{day_name, day_name_for, DAY_NAMES};

pub use weather_data::client::*;
pub use weather_data::retry::*;

pub use output::error::WriteError;
pub use weather_data::error::FetchError;
