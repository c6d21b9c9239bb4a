use crate::config::FetchConfig;
use crate::error::ForecastError;
use crate::pipeline::Outlooks;
use crate::types::date_window::DateWindow;
use crate::types::unit_group::UnitGroup;
use chrono::NaiveDate;
use log::debug;
use std::collections::{hash_map::Entry, HashMap};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Identifies one fetch: same location, units, threshold and zone, same window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    location: String,
    unit_group: UnitGroup,
    hot_threshold_bits: u64,
    time_zone: String,
    tomorrow: NaiveDate,
}

impl CacheKey {
    pub fn new(config: &FetchConfig, window: &DateWindow) -> Self {
        Self {
            location: config.location.clone(),
            unit_group: config.unit_group,
            hot_threshold_bits: config.hot_threshold.to_bits(),
            time_zone: config.time_zone.trim().to_string(),
            tomorrow: window.tomorrow,
        }
    }
}

/// In-memory TTL cache for transformed outlooks.
pub struct OutlookCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, Outlooks)>>,
}

impl OutlookCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, stored_at: Instant) -> bool {
        stored_at.elapsed() < self.ttl
    }

    /// Returns the cached outlooks for `key`, or runs `fetch` and stores its result.
    ///
    /// The lock is not held while `fetch` runs. If another caller stored a
    /// fresh entry in the meantime, that entry wins and our result is dropped.
    /// Errors are never cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: CacheKey,
        fetch: F,
    ) -> Result<Outlooks, ForecastError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Outlooks, ForecastError>>,
    {
        {
            let entries = self.entries.lock().await;
            if let Some((stored_at, outlooks)) = entries.get(&key) {
                if self.is_fresh(*stored_at) {
                    debug!("Outlook cache hit for {:?}", key);
                    return Ok(outlooks.clone());
                }
            }
        }

        let fetched = fetch().await?;

        let mut entries = self.entries.lock().await;
        match entries.entry(key) {
            Entry::Occupied(mut entry) => {
                if self.is_fresh(entry.get().0) {
                    Ok(entry.get().1.clone())
                } else {
                    entry.insert((Instant::now(), fetched.clone()));
                    Ok(fetched)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((Instant::now(), fetched.clone()));
                Ok(fetched)
            }
        }
    }

    /// Drops every expired entry.
    pub async fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries
            .lock()
            .await
            .retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

impl Default for OutlookCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
