//! Computes the request windows ("tomorrow" and the week starting tomorrow)
//! relative to the local calendar date of a named time zone.

use crate::config::ConfigError;
use crate::types::rows::OutputKind;
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Number of calendar days covered by the week window, tomorrow included.
pub const WEEK_DAYS: u64 = 7;

/// An inclusive range of calendar dates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Number of calendar days in the range, both ends included.
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    /// Iterates over every date in the range.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// The two date windows requested on every run.
///
/// `tomorrow` is the local date of "now" in the configured zone plus one day,
/// and `week_end` is six days after that, so the week spans seven days with
/// tomorrow included. Using the zone's local date (not the UTC date) keeps the
/// window boundary aligned with the user's midnight.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, TimeZone};
/// use chrono_tz::America::Los_Angeles;
/// use forecast_csv::DateWindow;
///
/// let now = Los_Angeles.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap();
/// let window = DateWindow::compute(Los_Angeles, now.to_utc()).unwrap();
/// assert_eq!(window.tomorrow, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
/// assert_eq!(window.week_end, NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub tomorrow: NaiveDate,
    pub week_end: NaiveDate,
}

impl DateWindow {
    /// Computes the window for `zone` at the instant `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DateOutOfRange`] if the window would fall outside
    /// the range chrono can represent.
    pub fn compute(zone: Tz, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let today = now.with_timezone(&zone).date_naive();
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .ok_or(ConfigError::DateOutOfRange(today))?;
        let week_end = tomorrow
            .checked_add_days(Days::new(WEEK_DAYS - 1))
            .ok_or(ConfigError::DateOutOfRange(tomorrow))?;
        Ok(Self { tomorrow, week_end })
    }

    /// Resolves an IANA zone name (e.g. `America/Los_Angeles`) and computes the window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimeZone`] if the name is not in the tz database.
    pub fn for_zone(zone_name: &str, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        Self::compute(parse_zone(zone_name)?, now)
    }

    /// Like [`DateWindow::for_zone`], using the wall clock.
    pub fn now(zone_name: &str) -> Result<Self, ConfigError> {
        Self::for_zone(zone_name, Utc::now())
    }

    pub fn tomorrow_range(&self) -> DateRange {
        DateRange {
            start: self.tomorrow,
            end: self.tomorrow,
        }
    }

    pub fn week_range(&self) -> DateRange {
        DateRange {
            start: self.tomorrow,
            end: self.week_end,
        }
    }

    pub fn range_for(&self, kind: OutputKind) -> DateRange {
        match kind {
            OutputKind::Tomorrow => self.tomorrow_range(),
            OutputKind::Week => self.week_range(),
        }
    }
}

/// Parses an IANA time-zone identifier.
pub(crate) fn parse_zone(zone_name: &str) -> Result<Tz, ConfigError> {
    zone_name
        .trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimeZone(zone_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;
    use chrono_tz::Asia::Tokyo;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_for_san_francisco_morning() {
        let now = Los_Angeles
            .with_ymd_and_hms(2024, 6, 10, 10, 0, 0)
            .unwrap()
            .to_utc();
        let window = DateWindow::for_zone("America/Los_Angeles", now).unwrap();
        assert_eq!(window.tomorrow, date(2024, 6, 11));
        assert_eq!(window.week_end, date(2024, 6, 17));
        assert_eq!(window.week_range().len_days(), 7);
        assert_eq!(window.tomorrow_range().len_days(), 1);
    }

    #[test]
    fn test_window_uses_local_date_not_utc() {
        // 05:00 UTC on the 11th is still 22:00 on the 10th in Los Angeles.
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 5, 0, 0).unwrap();
        let window = DateWindow::compute(Los_Angeles, now).unwrap();
        assert_eq!(window.tomorrow, date(2024, 6, 11));

        // ...and already 14:00 on the 11th in Tokyo.
        let window = DateWindow::compute(Tokyo, now).unwrap();
        assert_eq!(window.tomorrow, date(2024, 6, 12));
    }

    #[test]
    fn test_window_crosses_month_and_year() {
        let now = Utc.with_ymd_and_hms(2024, 12, 30, 12, 0, 0).unwrap();
        let window = DateWindow::for_zone("UTC", now).unwrap();
        assert_eq!(window.tomorrow, date(2024, 12, 31));
        assert_eq!(window.week_end, date(2025, 1, 6));
        let days: Vec<_> = window.week_range().days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days.first(), Some(&date(2024, 12, 31)));
        assert_eq!(days.last(), Some(&date(2025, 1, 6)));
    }

    #[test]
    fn test_unknown_zone_is_config_error() {
        let err = DateWindow::for_zone("Mars/Olympus_Mons", Utc::now()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTimeZone(ref z) if z == "Mars/Olympus_Mons"));
    }

    #[test]
    fn test_range_for_output_kind() {
        let window = DateWindow {
            tomorrow: date(2024, 6, 11),
            week_end: date(2024, 6, 17),
        };
        assert_eq!(window.range_for(OutputKind::Tomorrow), window.tomorrow_range());
        assert_eq!(window.range_for(OutputKind::Week), window.week_range());
        assert_eq!(window.week_range().to_string(), "2024-06-11 → 2024-06-17");
    }
}
