//! Row shapes flowing through the pipeline and the column names that go with them.

use serde::{Deserialize, Serialize};
use std::fmt;

// Source columns, as named in the API's CSV header.
pub(crate) const SRC_DATETIME: &str = "datetime";
pub(crate) const SRC_TEMP: &str = "temp";
pub(crate) const SRC_TEMPMIN: &str = "tempmin";
pub(crate) const SRC_TEMPMAX: &str = "tempmax";
pub(crate) const SRC_PRECIP: &str = "precip";

// Output columns.
pub(crate) const COL_DATE: &str = "date";
pub(crate) const COL_TAVG: &str = "tavg";
pub(crate) const COL_TMIN: &str = "tmin";
pub(crate) const COL_TMAX: &str = "tmax";
pub(crate) const COL_PRCP: &str = "prcp";
pub(crate) const COL_TEMP_RANGE: &str = "temp_range";
pub(crate) const COL_DAY: &str = "day";
pub(crate) const COL_IS_RAINY: &str = "is_rainy";
pub(crate) const COL_IS_HOT: &str = "is_hot";

/// Columns every API response must carry, in request order.
pub const REQUIRED_SOURCE_COLUMNS: [&str; 5] =
    [SRC_DATETIME, SRC_TEMP, SRC_TEMPMIN, SRC_TEMPMAX, SRC_PRECIP];

/// Canonical output columns, in file order.
pub const OUTPUT_COLUMNS: [&str; 9] = [
    COL_DATE,
    COL_TAVG,
    COL_TMIN,
    COL_TMAX,
    COL_PRCP,
    COL_TEMP_RANGE,
    COL_DAY,
    COL_IS_RAINY,
    COL_IS_HOT,
];

/// The header line written at the top of every output file (without newline).
pub fn output_header() -> String {
    OUTPUT_COLUMNS.join(",")
}

/// Which of the two output files a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// The single day after today.
    Tomorrow,
    /// Seven days starting tomorrow.
    Week,
}

impl OutputKind {
    pub const ALL: [OutputKind; 2] = [OutputKind::Tomorrow, OutputKind::Week];

    /// File name inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputKind::Tomorrow => "yarin.csv",
            OutputKind::Week => "week.csv",
        }
    }

    /// Number of rows a successful fetch is expected to produce.
    pub fn expected_rows(&self) -> usize {
        match self {
            OutputKind::Tomorrow => 1,
            OutputKind::Week => 7,
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Tomorrow => write!(f, "tomorrow"),
            OutputKind::Week => write!(f, "week"),
        }
    }
}

/// One calendar day as delivered by the API.
///
/// `date` is kept as delivered; it is only parsed when deriving the weekday.
/// Temperatures and precipitation are in the unit group of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRow {
    pub date: String,
    pub tavg: Option<f64>,
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub prcp: Option<f64>,
}

/// A [`WeatherRow`] with the derived indicator columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub date: String,
    pub tavg: Option<f64>,
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub prcp: Option<f64>,
    /// `tmax - tmin`; negative only if the source is inconsistent.
    pub temp_range: Option<f64>,
    /// Localized weekday name, `None` when `date` does not parse.
    pub day: Option<String>,
    pub is_rainy: i32,
    pub is_hot: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_header_is_fixed() {
        assert_eq!(
            output_header(),
            "date,tavg,tmin,tmax,prcp,temp_range,day,is_rainy,is_hot"
        );
    }

    #[test]
    fn test_output_kind_files() {
        assert_eq!(OutputKind::Tomorrow.file_name(), "yarin.csv");
        assert_eq!(OutputKind::Week.file_name(), "week.csv");
        assert_eq!(OutputKind::Tomorrow.expected_rows(), 1);
        assert_eq!(OutputKind::Week.expected_rows(), 7);
    }
}
