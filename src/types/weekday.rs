use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Localized weekday names, indexed Monday=0 .. Sunday=6.
pub const DAY_NAMES: [&str; 7] = [
    "Pazartesi",
    "Salı",
    "Çarşamba",
    "Perşembe",
    "Cuma",
    "Cumartesi",
    "Pazar",
];

/// Returns the localized weekday name for `date`.
pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

/// Parses a date as delivered by the API and maps it to its weekday name.
///
/// Accepts `YYYY-MM-DD` and full ISO datetimes. Anything else yields `None`.
pub fn day_name_for(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .ok()
        .map(day_name)
}
