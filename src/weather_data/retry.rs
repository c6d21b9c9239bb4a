//! Retry policy for idempotent GET requests against the weather API.
//!
//! Retries transient failures only:
//! - statuses 429, 500, 502, 503 and 504
//! - connect errors and timeouts
//!
//! Everything else (other 4xx, malformed requests) is returned on the first try.

use log::{debug, info, warn};
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;

/// Statuses that trigger another attempt.
pub const RETRY_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Wait before the first retry; doubles on every further retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single wait, `Retry-After` included.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0 for the first retry).
    pub fn backoff_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    fn wait_before_retry(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff_for_retry(retry);
        retry_after
            .map_or(backoff, |hinted| hinted.max(backoff))
            .min(self.max_backoff)
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status)
}

pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

/// Parses a `Retry-After` header given in whole seconds. HTTP-date values are ignored.
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Runs `operation` until it yields a non-retryable outcome or the attempt
/// budget is spent.
///
/// The returned response may still carry an error status; the caller decides
/// how to report it. `label` is only used for logging and must not contain secrets.
pub async fn send_with_retry<F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    operation: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let has_budget = attempt < max_attempts;
        let wait = match operation().await {
            Ok(response) if has_budget && is_retryable_status(response.status()) => {
                let wait = policy.wait_before_retry(attempt - 1, retry_after(&response));
                warn!(
                    "{} returned {} on attempt {}/{}, retrying in {:?}",
                    label,
                    response.status(),
                    attempt,
                    max_attempts,
                    wait
                );
                wait
            }
            Ok(response) => {
                if attempt > 1 {
                    info!("{} answered {} after {} attempts", label, response.status(), attempt);
                }
                return Ok(response);
            }
            Err(e) if has_budget && is_retryable_error(&e) => {
                let wait = policy.wait_before_retry(attempt - 1, None);
                warn!(
                    "{} failed on attempt {}/{} ({}), retrying in {:?}",
                    label, attempt, max_attempts, e, wait
                );
                wait
            }
            Err(e) => {
                debug!("{} failed without retry: {}", label, e);
                return Err(e);
            }
        };

        tokio::time::sleep(wait).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_doubles_from_half_a_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for_retry(0), Duration::from_millis(500));
        assert_eq!(policy.backoff_for_retry(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for_retry(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::new(10, 500, 1500);
        assert_eq!(policy.backoff_for_retry(2), Duration::from_millis(1500));
        assert_eq!(policy.backoff_for_retry(40), Duration::from_millis(1500));
    }

    #[test]
    fn test_retry_after_extends_wait_up_to_cap() {
        let policy = RetryPolicy::new(4, 500, 10_000);
        assert_eq!(
            policy.wait_before_retry(0, Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
        assert_eq!(
            policy.wait_before_retry(0, Some(Duration::from_secs(60))),
            Duration::from_secs(10)
        );
        // A hint shorter than the backoff does not shorten it.
        assert_eq!(
            policy.wait_before_retry(1, Some(Duration::from_millis(10))),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_retryable_statuses() {
        for status in RETRY_STATUSES {
            assert!(is_retryable_status(status), "{status} should retry");
        }
        assert!(!is_retryable_status(StatusCode::OK));
        assert!(!is_retryable_status(StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::NOT_IMPLEMENTED));
    }
}
