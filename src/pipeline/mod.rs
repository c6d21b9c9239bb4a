//! Ties the pieces together: window, fetch, transform, write.

pub mod outlook_cache;

use crate::config::{FetchConfig, MissingKeyPolicy};
use crate::error::ForecastError;
use crate::frames::daily_outlook::DailyOutlook;
use crate::frames::transform::transform;
use crate::output::csv_writer::{write_outlook, write_placeholder};
use crate::pipeline::outlook_cache::{CacheKey, OutlookCache};
use crate::types::date_window::DateWindow;
use crate::types::rows::OutputKind;
use crate::weather_data::client::WeatherClient;
use chrono::{DateTime, Utc};
use futures_util::try_join;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Both transformed tables of one run, plus the window they were fetched for.
#[derive(Debug, Clone)]
pub struct Outlooks {
    pub window: DateWindow,
    pub tomorrow: DailyOutlook,
    pub week: DailyOutlook,
}

impl Outlooks {
    pub fn get(&self, kind: OutputKind) -> &DailyOutlook {
        match kind {
            OutputKind::Tomorrow => &self.tomorrow,
            OutputKind::Week => &self.week,
        }
    }
}

/// What a successful run left on disk.
#[derive(Debug)]
pub enum RunOutcome {
    /// Data was fetched and both files hold real rows.
    Fetched {
        outlooks: Outlooks,
        tomorrow_path: PathBuf,
        week_path: PathBuf,
    },
    /// No API key was available; both files hold only the header.
    Placeholder {
        tomorrow_path: PathBuf,
        week_path: PathBuf,
    },
}

impl RunOutcome {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RunOutcome::Placeholder { .. })
    }

    /// Written files, tomorrow first.
    pub fn paths(&self) -> [&Path; 2] {
        match self {
            RunOutcome::Fetched {
                tomorrow_path,
                week_path,
                ..
            }
            | RunOutcome::Placeholder {
                tomorrow_path,
                week_path,
            } => [tomorrow_path.as_path(), week_path.as_path()],
        }
    }

    pub fn outlooks(&self) -> Option<&Outlooks> {
        match self {
            RunOutcome::Fetched { outlooks, .. } => Some(outlooks),
            RunOutcome::Placeholder { .. } => None,
        }
    }
}

/// Runs the fetch → transform → write sequence for a [`FetchConfig`].
///
/// A `Pipeline` owns one [`WeatherClient`], so both windows share a
/// connection pool, and optionally an [`OutlookCache`].
///
/// # Examples
///
/// ```no_run
/// use forecast_csv::{FetchConfig, Pipeline};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), forecast_csv::ForecastError> {
/// let pipeline = Pipeline::with_defaults()?;
/// let key = std::env::var("VISUAL_CROSSING_API_KEY").ok();
/// let outcome = pipeline.run(&FetchConfig::default(), key.as_deref()).await?;
/// for path in outcome.paths() {
///     println!("wrote {}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    client: WeatherClient,
    cache: Option<OutlookCache>,
    run_timeout: Option<Duration>,
}

impl Pipeline {
    pub fn new(client: WeatherClient) -> Self {
        Self {
            client,
            cache: None,
            run_timeout: None,
        }
    }

    pub fn with_defaults() -> Result<Self, ForecastError> {
        Ok(Self::new(WeatherClient::with_defaults()?))
    }

    /// Keeps fetched outlooks for `ttl`, keyed by config and window start.
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache = Some(OutlookCache::new(ttl));
        self
    }

    /// Fails a run with [`ForecastError::TimedOut`] once `limit` has elapsed.
    pub fn with_run_timeout(mut self, limit: Duration) -> Self {
        self.run_timeout = Some(limit);
        self
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub fn cache(&self) -> Option<&OutlookCache> {
        self.cache.as_ref()
    }

    /// Runs once against the wall clock.
    pub async fn run(
        &self,
        config: &FetchConfig,
        api_key: Option<&str>,
    ) -> Result<RunOutcome, ForecastError> {
        self.run_at(config, api_key, Utc::now()).await
    }

    /// Runs once as if the current instant were `now`.
    pub async fn run_at(
        &self,
        config: &FetchConfig,
        api_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, ForecastError> {
        self.run_with_cancel(config, api_key, now, CancellationToken::new())
            .await
    }

    /// Like [`Pipeline::run_at`], aborting with [`ForecastError::Cancelled`]
    /// as soon as `cancel` fires.
    ///
    /// In-flight requests are dropped. A file is only ever replaced as a whole,
    /// so a cancelled run leaves each output either untouched or complete.
    pub async fn run_with_cancel(
        &self,
        config: &FetchConfig,
        api_key: Option<&str>,
        now: DateTime<Utc>,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, ForecastError> {
        let guarded = async {
            let run = self.run_once(config, api_key, now);
            match self.run_timeout {
                Some(limit) => tokio::time::timeout(limit, run)
                    .await
                    .map_err(|_| ForecastError::TimedOut(limit))?,
                None => run.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Run for '{}' cancelled", config.location);
                Err(ForecastError::Cancelled)
            }
            result = guarded => result,
        }
    }

    async fn run_once(
        &self,
        config: &FetchConfig,
        api_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, ForecastError> {
        config.validate()?;
        let tomorrow_path = config.output_path(OutputKind::Tomorrow);
        let week_path = config.output_path(OutputKind::Week);

        let Some(api_key) = api_key.map(str::trim).filter(|key| !key.is_empty()) else {
            return match config.on_missing_key {
                MissingKeyPolicy::Fail => Err(ForecastError::MissingCredential),
                MissingKeyPolicy::WritePlaceholder => {
                    warn!(
                        "No API key configured, writing placeholder files to {:?}",
                        config.output_dir
                    );
                    write_placeholder(&tomorrow_path).await?;
                    write_placeholder(&week_path).await?;
                    Ok(RunOutcome::Placeholder {
                        tomorrow_path,
                        week_path,
                    })
                }
            };
        };

        let outlooks = self.fetch_outlooks(config, api_key, now).await?;

        write_outlook(&tomorrow_path, &outlooks.tomorrow).await?;
        write_outlook(&week_path, &outlooks.week).await?;
        info!(
            "Run for '{}' complete: {} and {}",
            config.location,
            tomorrow_path.display(),
            week_path.display()
        );

        Ok(RunOutcome::Fetched {
            outlooks,
            tomorrow_path,
            week_path,
        })
    }

    /// Fetches and transforms both windows without touching the disk.
    ///
    /// Served from the cache when one is configured and holds a fresh entry
    /// for the same config and window.
    ///
    /// # Errors
    ///
    /// [`ForecastError::MissingCredential`] for a blank key, otherwise the
    /// first config, fetch or transform error of either window.
    pub async fn fetch_outlooks(
        &self,
        config: &FetchConfig,
        api_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Outlooks, ForecastError> {
        let zone = config.validate()?;
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ForecastError::MissingCredential);
        }
        let window = DateWindow::compute(zone, now)?;

        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_fetch(CacheKey::new(config, &window), || {
                        self.fetch_uncached(config, api_key, window)
                    })
                    .await
            }
            None => self.fetch_uncached(config, api_key, window).await,
        }
    }

    async fn fetch_uncached(
        &self,
        config: &FetchConfig,
        api_key: &str,
        window: DateWindow,
    ) -> Result<Outlooks, ForecastError> {
        info!(
            "Fetching '{}' for tomorrow ({}) and week ({})",
            config.location,
            window.tomorrow,
            window.week_range()
        );

        let (tomorrow_raw, week_raw) = try_join!(
            self.client.fetch_range(
                &config.location,
                window.tomorrow_range(),
                config.unit_group,
                api_key
            ),
            self.client.fetch_range(
                &config.location,
                window.week_range(),
                config.unit_group,
                api_key
            ),
        )?;

        let outlooks = Outlooks {
            window,
            tomorrow: transform(tomorrow_raw, config.hot_threshold)?,
            week: transform(week_raw, config.hot_threshold)?,
        };
        for kind in OutputKind::ALL {
            check_row_count(kind, outlooks.get(kind));
        }
        Ok(outlooks)
    }
}

fn check_row_count(kind: OutputKind, outlook: &DailyOutlook) {
    let expected = kind.expected_rows();
    if outlook.height() != expected {
        warn!(
            "Expected {} row(s) for {}, API returned {}; writing them as received",
            expected,
            kind,
            outlook.height()
        );
    }
}
