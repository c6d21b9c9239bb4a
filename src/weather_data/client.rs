//! HTTP client for the Visual Crossing timeline endpoint.
//!
//! A [`WeatherClient`] owns one `reqwest::Client` (connection pool included) and
//! can be shared between concurrent fetches. Every call goes through the
//! [`RetryPolicy`] and returns the validated, still untransformed table.

use crate::types::date_window::DateRange;
use crate::types::unit_group::UnitGroup;
use crate::weather_data::error::FetchError;
use crate::weather_data::retry::{send_with_retry, RetryPolicy};
use crate::weather_data::schema::parse_days_csv;
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use polars::frame::DataFrame;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio::task;

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// How much of an error body is kept for diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 400;

const ELEMENTS: &str = "datetime,temp,tempmin,tempmax,precip";
const REDACTED_KEY: &str = "***";

/// Connection settings for a [`WeatherClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    /// Timeline endpoint; location and dates are appended as path segments.
    pub base_url: String,
    /// Per-request timeout, applied to every attempt.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
}

#[bon]
impl WeatherClient {
    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidBaseUrl`] if the base URL does not parse or
    /// cannot carry path segments, and [`FetchError::ClientBuild`] if the TLS
    /// backend fails to initialize.
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| FetchError::InvalidBaseUrl(settings.base_url.clone()))?;

        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            retry: settings.retry,
        })
    }

    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientSettings::default())
    }

    /// Builds the full request URL, key included.
    pub(crate) fn request_url(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
        unit_group: UnitGroup,
        api_key: &str,
    ) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(location)
                .push(&start.to_string())
                .push(&end.to_string());
        }
        url.query_pairs_mut()
            .append_pair("unitGroup", unit_group.query_value())
            .append_pair("include", "days")
            .append_pair("elements", ELEMENTS)
            .append_pair("contentType", "csv")
            .append_pair("key", api_key);
        url
    }

    /// Fetches daily rows for the inclusive range `start..=end`.
    ///
    /// The returned frame carries the API's own column names
    /// (`datetime, temp, tempmin, tempmax, precip`, possibly more).
    ///
    /// # Errors
    ///
    /// * [`FetchError::NetworkRequest`] when the request cannot be sent, after retries.
    /// * [`FetchError::HttpStatus`] when the final status is not 2xx.
    /// * [`FetchError::CsvParse`] / [`FetchError::MissingColumns`] when the body is unusable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use forecast_csv::{UnitGroup, WeatherClient, ForecastError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ForecastError> {
    /// let client = WeatherClient::with_defaults()?;
    /// let day = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
    /// let raw = client
    ///     .fetch_days()
    ///     .location("San Francisco,CA")
    ///     .start(day)
    ///     .end(day)
    ///     .unit_group(UnitGroup::Metric)
    ///     .api_key("YOUR_KEY")
    ///     .call()
    ///     .await?;
    /// println!("{raw}");
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_days(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
        unit_group: UnitGroup,
        api_key: &str,
    ) -> Result<DataFrame, FetchError> {
        let url = self.request_url(location, start, end, unit_group, api_key);
        let label = self
            .request_url(location, start, end, unit_group, REDACTED_KEY)
            .to_string();
        info!("Requesting {} → {} for '{}' ({})", start, end, location, unit_group);

        let response = send_with_retry(&self.retry, &label, || {
            let request = self.http.get(url.clone());
            async move { request.send().await.map_err(reqwest::Error::without_url) }
        })
        .await
        .map_err(|e| FetchError::NetworkRequest(label.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body_preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            warn!("HTTP {} for {}: {}", status, label, body_preview);
            return Err(FetchError::HttpStatus {
                url: label,
                status,
                body_preview,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::BodyRead(label.clone(), e.without_url()))?;
        info!("Received {} bytes from {}", body.len(), label);

        task::spawn_blocking(move || parse_days_csv(body.to_vec())).await?
    }

    /// Convenience wrapper over [`WeatherClient::fetch_days`] for a [`DateRange`].
    pub async fn fetch_range(
        &self,
        location: &str,
        range: DateRange,
        unit_group: UnitGroup,
        api_key: &str,
    ) -> Result<DataFrame, FetchError> {
        self.fetch_days()
            .location(location)
            .start(range.start)
            .end(range.end)
            .unit_group(unit_group)
            .api_key(api_key)
            .call()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_request_url_layout() {
        let client = WeatherClient::with_defaults().unwrap();
        let url = client.request_url(
            "San Francisco,CA",
            date(2024, 6, 11),
            date(2024, 6, 17),
            UnitGroup::Metric,
            "secret",
        );

        assert_eq!(url.host_str(), Some("weather.visualcrossing.com"));
        assert!(url
            .path()
            .ends_with("/timeline/San%20Francisco,CA/2024-06-11/2024-06-17"));

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |name: &str| {
            query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("unitGroup"), Some("metric"));
        assert_eq!(get("include"), Some("days"));
        assert_eq!(get("elements"), Some("datetime,temp,tempmin,tempmax,precip"));
        assert_eq!(get("contentType"), Some("csv"));
        assert_eq!(get("key"), Some("secret"));
    }

    #[test]
    fn test_request_url_handles_trailing_slash_and_slashes_in_location() {
        let settings = ClientSettings {
            base_url: "http://localhost:9000/timeline/".to_string(),
            ..Default::default()
        };
        let client = WeatherClient::new(settings).unwrap();
        let url = client.request_url(
            "a/b",
            date(2024, 1, 1),
            date(2024, 1, 1),
            UnitGroup::Us,
            "k",
        );
        assert_eq!(url.path(), "/timeline/a%2Fb/2024-01-01/2024-01-01");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        for bad in ["not a url", "mailto:someone@example.com"] {
            let settings = ClientSettings {
                base_url: bad.to_string(),
                ..Default::default()
            };
            assert!(matches!(
                WeatherClient::new(settings),
                Err(FetchError::InvalidBaseUrl(_))
            ));
        }
    }
}
