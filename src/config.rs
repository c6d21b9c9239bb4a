//! Run configuration handed to the [`crate::Pipeline`] by whichever front-end
//! drives it. Nothing in the core reads the environment; adapters resolve
//! flags and variables into a [`FetchConfig`] once and pass it in.

use crate::types::date_window::parse_zone;
use crate::types::rows::OutputKind;
use crate::types::unit_group::UnitGroup;
use bon::Builder;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "crime_prediction_data";
pub const DEFAULT_LOCATION: &str = "San Francisco,CA";
pub const DEFAULT_HOT_THRESHOLD: f64 = 30.0;
pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown unit group '{0}' (expected one of metric, us, uk, base)")]
    UnknownUnitGroup(String),

    #[error("Unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Hot threshold must be a finite number, got {0}")]
    InvalidHotThreshold(f64),

    #[error("Date window starting after {0} is out of range")]
    DateOutOfRange(NaiveDate),
}

/// What to do when no API key is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Write header-only placeholder files and finish successfully.
    #[default]
    WritePlaceholder,
    /// Fail the run with [`crate::ForecastError::MissingCredential`].
    Fail,
}

/// Everything a run needs to know besides the API key.
///
/// Defaults: San Francisco, metric units, a 30° hot threshold, Pacific time
/// and `crime_prediction_data/` as output directory.
///
/// # Examples
///
/// ```
/// use forecast_csv::{FetchConfig, MissingKeyPolicy, UnitGroup};
///
/// let config = FetchConfig::builder()
///     .location("Austin,TX")
///     .unit_group(UnitGroup::Us)
///     .hot_threshold(95.0)
///     .time_zone("America/Chicago")
///     .output_dir("out")
///     .on_missing_key(MissingKeyPolicy::Fail)
///     .build();
///
/// assert_eq!(config.unit_group, UnitGroup::Us);
/// assert!(config.validate().is_ok());
/// assert_eq!(FetchConfig::default().location, "San Francisco,CA");
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    #[builder(into, default = DEFAULT_LOCATION.to_string())]
    pub location: String,

    #[builder(default)]
    pub unit_group: UnitGroup,

    /// Compared against `tmax` in the same unit group; never converted.
    #[builder(default = DEFAULT_HOT_THRESHOLD)]
    pub hot_threshold: f64,

    /// IANA zone whose local midnight delimits "tomorrow".
    #[builder(into, default = DEFAULT_TIME_ZONE.to_string())]
    pub time_zone: String,

    #[builder(into, default = PathBuf::from(DEFAULT_OUTPUT_DIR))]
    pub output_dir: PathBuf,

    #[builder(default)]
    pub on_missing_key: MissingKeyPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FetchConfig {
    /// Checks the fields that can be wrong at runtime and resolves the time zone.
    ///
    /// The unit group is already guaranteed by its type, and whether the hot
    /// threshold matches the unit group is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLocation`], [`ConfigError::InvalidHotThreshold`]
    /// or [`ConfigError::UnknownTimeZone`].
    pub fn validate(&self) -> Result<Tz, ConfigError> {
        if self.location.trim().is_empty() {
            return Err(ConfigError::EmptyLocation);
        }
        if !self.hot_threshold.is_finite() {
            return Err(ConfigError::InvalidHotThreshold(self.hot_threshold));
        }
        parse_zone(&self.time_zone)
    }

    /// Full path of the output file for `kind`.
    pub fn output_path(&self, kind: OutputKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.location, DEFAULT_LOCATION);
        assert_eq!(config.unit_group, UnitGroup::Metric);
        assert_eq!(config.hot_threshold, 30.0);
        assert_eq!(config.time_zone, "America/Los_Angeles");
        assert_eq!(config.output_dir, PathBuf::from("crime_prediction_data"));
        assert_eq!(config.on_missing_key, MissingKeyPolicy::WritePlaceholder);
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let empty = FetchConfig::builder().location("  ").build();
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyLocation)));

        let nan = FetchConfig::builder().hot_threshold(f64::NAN).build();
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::InvalidHotThreshold(_))
        ));

        let tz = FetchConfig::builder().time_zone("Not/AZone").build();
        assert!(matches!(tz.validate(), Err(ConfigError::UnknownTimeZone(_))));
    }

    #[test]
    fn test_validate_returns_zone() {
        let config = FetchConfig::builder().time_zone("Europe/Istanbul").build();
        assert_eq!(config.validate().unwrap(), chrono_tz::Europe::Istanbul);
    }

    #[test]
    fn test_output_paths() {
        let config = FetchConfig::builder().output_dir("/tmp/wx").build();
        assert_eq!(
            config.output_path(OutputKind::Tomorrow),
            PathBuf::from("/tmp/wx/yarin.csv")
        );
        assert_eq!(
            config.output_path(OutputKind::Week),
            PathBuf::from("/tmp/wx/week.csv")
        );
    }

    #[test]
    fn test_deserialize_partial_config_fills_defaults() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"location":"Ankara","unit_group":"uk"}"#).unwrap();
        assert_eq!(config.location, "Ankara");
        assert_eq!(config.unit_group, UnitGroup::Uk);
        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(config.on_missing_key, MissingKeyPolicy::WritePlaceholder);
    }
}
