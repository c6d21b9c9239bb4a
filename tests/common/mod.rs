#![allow(dead_code)]

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::America::Los_Angeles;
use forecast_csv::{ClientSettings, RetryPolicy, WeatherClient};
use std::time::Duration;
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const HEADER: &str = "datetime,temp,tempmin,tempmax,precip";

/// 2024-06-10 10:00 in San Francisco, a Monday.
pub fn sf_morning() -> DateTime<Utc> {
    Los_Angeles
        .with_ymd_and_hms(2024, 6, 10, 10, 0, 0)
        .unwrap()
        .to_utc()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Retries quickly so the retry tests do not sleep for seconds.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(4, 1, 10)
}

pub fn create_test_client(mock_server: &MockServer) -> WeatherClient {
    WeatherClient::new(ClientSettings {
        base_url: format!("{}/timeline", mock_server.uri()),
        timeout: Duration::from_secs(5),
        retry: fast_retry(),
    })
    .unwrap()
}

/// A CSV body with `days` rows starting at `start`.
///
/// Row `i` has tmax `26 + 2i` and rain on odd rows.
pub fn days_csv(start: NaiveDate, days: u64) -> String {
    let mut body = format!("{HEADER}\n");
    for i in 0..days {
        let day = start.checked_add_days(Days::new(i)).unwrap();
        let tmax = 26.0 + 2.0 * i as f64;
        let precip = if i % 2 == 1 { 1.5 } else { 0.0 };
        body.push_str(&format!("{day},18.5,12.5,{tmax},{precip}\n"));
    }
    body
}
