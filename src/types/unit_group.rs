//! Defines the measurement system selector understood by the Visual Crossing API.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The API's enumerated unit system (`unitGroup` query parameter).
///
/// The unit group controls the units of both the request and the response:
/// temperatures come back in °C for [`UnitGroup::Metric`] and [`UnitGroup::Uk`],
/// °F for [`UnitGroup::Us`] and Kelvin for [`UnitGroup::Base`]. No conversion is
/// performed anywhere in this crate, so a hot threshold must be expressed in the
/// same system.
///
/// # Examples
///
/// ```
/// use forecast_csv::UnitGroup;
///
/// let unit: UnitGroup = "us".parse().unwrap();
/// assert_eq!(unit, UnitGroup::Us);
/// assert_eq!(unit.to_string(), "us");
/// assert!("imperial".parse::<UnitGroup>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitGroup {
    /// Celsius, millimetres, km/h.
    #[default]
    Metric,
    /// Fahrenheit, inches, mph.
    Us,
    /// Celsius, millimetres, mph.
    Uk,
    /// Kelvin, millimetres, m/s.
    Base,
}

impl UnitGroup {
    /// Every accepted unit group, in the order the API documents them.
    pub const ALL: [UnitGroup; 4] = [
        UnitGroup::Metric,
        UnitGroup::Us,
        UnitGroup::Uk,
        UnitGroup::Base,
    ];

    pub(crate) fn query_value(&self) -> &'static str {
        match self {
            UnitGroup::Metric => "metric",
            UnitGroup::Us => "us",
            UnitGroup::Uk => "uk",
            UnitGroup::Base => "base",
        }
    }
}

impl fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

impl FromStr for UnitGroup {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        UnitGroup::ALL
            .into_iter()
            .find(|unit| unit.query_value().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownUnitGroup(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_known_unit_group() {
        for unit in UnitGroup::ALL {
            let parsed: UnitGroup = unit.to_string().parse().unwrap();
            assert_eq!(parsed, unit);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("METRIC".parse::<UnitGroup>().unwrap(), UnitGroup::Metric);
        assert_eq!(" Uk ".parse::<UnitGroup>().unwrap(), UnitGroup::Uk);
    }

    #[test]
    fn test_unknown_unit_group_is_rejected() {
        let err = "kelvin".parse::<UnitGroup>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownUnitGroup(ref s) if s == "kelvin"));
        assert!("".parse::<UnitGroup>().is_err());
    }

    #[test]
    fn test_serde_uses_query_values() {
        let json = serde_json::to_string(&UnitGroup::Us).unwrap();
        assert_eq!(json, "\"us\"");
        let back: UnitGroup = serde_json::from_str("\"base\"").unwrap();
        assert_eq!(back, UnitGroup::Base);
    }
}
