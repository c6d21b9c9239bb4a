//! Turns the raw API table into the canonical nine-column outlook.

use crate::error::ForecastError;
use crate::frames::daily_outlook::DailyOutlook;
use crate::types::rows::*;
use crate::types::weekday::day_name_for;
use crate::weather_data::schema::require_columns;
use polars::prelude::*;

/// Source → output names, positionally aligned with [`REQUIRED_SOURCE_COLUMNS`].
const RENAMED: [&str; 5] = [COL_DATE, COL_TAVG, COL_TMIN, COL_TMAX, COL_PRCP];

/// Renames the source columns, derives `temp_range`, `day`, `is_rainy` and
/// `is_hot`, and keeps only the canonical columns in file order.
///
/// Pure: no I/O, and total over rows whose numeric fields parse. A date that
/// does not parse leaves `day` null for that row instead of failing the batch.
/// `hot_threshold` is compared against `tmax` as-is, without unit conversion.
///
/// # Errors
///
/// Returns [`ForecastError::Fetch`] with `MissingColumns` if a source column is
/// absent, or [`ForecastError::Frame`] if Polars fails to evaluate the plan.
///
/// # Examples
///
/// ```
/// use forecast_csv::{transform, weather_rows_to_frame, WeatherRow};
///
/// let raw = weather_rows_to_frame(&[WeatherRow {
///     date: "2024-01-01".into(),
///     tavg: Some(8.0),
///     tmin: Some(3.5),
///     tmax: Some(12.0),
///     prcp: Some(0.4),
/// }])?;
/// let rows = transform(raw, 10.0)?.rows()?;
/// assert_eq!(rows[0].day.as_deref(), Some("Pazartesi"));
/// assert_eq!(rows[0].temp_range, Some(8.5));
/// assert_eq!((rows[0].is_rainy, rows[0].is_hot), (1, 1));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn transform(raw: DataFrame, hot_threshold: f64) -> Result<DailyOutlook, ForecastError> {
    require_columns(&raw, &REQUIRED_SOURCE_COLUMNS)?;

    let mut df = raw
        .lazy()
        .rename(REQUIRED_SOURCE_COLUMNS, RENAMED, true)
        .with_columns([
            col(COL_DATE).cast(DataType::String),
            col(COL_TAVG).cast(DataType::Float64),
            col(COL_TMIN).cast(DataType::Float64),
            col(COL_TMAX).cast(DataType::Float64),
            col(COL_PRCP).cast(DataType::Float64),
        ])
        .with_columns([
            (col(COL_TMAX) - col(COL_TMIN)).alias(COL_TEMP_RANGE),
            indicator(col(COL_PRCP).gt(lit(0.0))).alias(COL_IS_RAINY),
            indicator(col(COL_TMAX).gt_eq(lit(hot_threshold))).alias(COL_IS_HOT),
        ])
        .collect()?;

    let day = day_column(&df)?;
    df.with_column(day)?;

    Ok(DailyOutlook::new(df.select(OUTPUT_COLUMNS)?))
}

/// 1/0 flag; a null comparison (missing value) counts as 0.
fn indicator(predicate: Expr) -> Expr {
    predicate.fill_null(lit(false)).cast(DataType::Int32)
}

fn day_column(df: &DataFrame) -> PolarsResult<Series> {
    let dates = df.column(COL_DATE)?.str()?;
    let names: Vec<Option<&'static str>> = dates
        .into_iter()
        .map(|date| date.and_then(day_name_for))
        .collect();
    Ok(Series::new(COL_DAY.into(), names))
}

/// Builds a raw frame, under the API's column names, from typed rows.
pub fn weather_rows_to_frame(rows: &[WeatherRow]) -> PolarsResult<DataFrame> {
    df!(
        SRC_DATETIME => rows.iter().map(|r| r.date.as_str()).collect::<Vec<_>>(),
        SRC_TEMP => rows.iter().map(|r| r.tavg).collect::<Vec<_>>(),
        SRC_TEMPMIN => rows.iter().map(|r| r.tmin).collect::<Vec<_>>(),
        SRC_TEMPMAX => rows.iter().map(|r| r.tmax).collect::<Vec<_>>(),
        SRC_PRECIP => rows.iter().map(|r| r.prcp).collect::<Vec<_>>(),
    )
}
