//! Periodic feed refresh into a shared registry.
//!
//! Each source is fetched, parsed and applied independently. A payload
//! whose server timestamp is not newer than the last one applied is left
//! alone. Failures abort only that source's pass and are reported through
//! a transient [`FeedStatus`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use roadwatch_disruptions::{
    parse_authority_feed, parse_council_feed, BatchReport, DataFetcher, DisruptionRegistry,
    FeedBatch, FeedSource, Result,
};
use tokio::sync::{Mutex, RwLock};
use tokio::time::MissedTickBehavior;

use crate::config::ClientConfig;
use crate::http::with_cache_buster;

pub type SharedRegistry = Arc<RwLock<DisruptionRegistry>>;

/// Per-source indicator
#[derive(Clone, Debug, PartialEq)]
pub enum FeedStatus {
    /// Nothing applied yet
    Idle,
    /// Last applied payload, stamped with its server time when it had one
    Updated { at: DateTime<Utc> },
    /// A refresh failed recently
    Failed { at: DateTime<Utc>, message: String },
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Waiting for first update"),
            Self::Updated { at } => {
                write!(f, "Last update: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))
            }
            Self::Failed { message, .. } => {
                write!(f, "Data update failed ({}), trying again soon", message)
            }
        }
    }
}

/// What one source's pass did
#[derive(Debug)]
pub enum RefreshOutcome {
    Applied {
        disruptions: usize,
        report: BatchReport,
    },
    /// Payload timestamp was not newer than the last one applied
    Unchanged,
}

/// Results of refreshing both sources
#[derive(Debug)]
pub struct RefreshReport {
    pub authority: Result<RefreshOutcome>,
    pub council: Result<RefreshOutcome>,
}

impl RefreshReport {
    pub fn iter(&self) -> impl Iterator<Item = (FeedSource, &Result<RefreshOutcome>)> {
        [
            (FeedSource::Authority, &self.authority),
            (FeedSource::Council, &self.council),
        ]
        .into_iter()
    }
}

#[derive(Debug, Default)]
struct SourceState {
    last_timestamp: Option<DateTime<Utc>>,
    last_updated: Option<DateTime<Utc>>,
    failure: Option<(DateTime<Utc>, String)>,
}

impl SourceState {
    fn status(&self, now: DateTime<Utc>, reset: Duration) -> FeedStatus {
        if let Some((at, message)) = &self.failure {
            let elapsed = (now - *at).to_std().unwrap_or_default();
            if elapsed < reset {
                return FeedStatus::Failed {
                    at: *at,
                    message: message.clone(),
                };
            }
        }

        match self.last_updated {
            Some(at) => FeedStatus::Updated { at },
            None => FeedStatus::Idle,
        }
    }
}

pub struct FeedRefresher<F> {
    fetcher: F,
    registry: SharedRegistry,
    authority_url: String,
    council_url: String,
    status_reset: Duration,
    authority: Mutex<SourceState>,
    council: Mutex<SourceState>,
}

impl<F: DataFetcher> FeedRefresher<F> {
    pub fn new(fetcher: F, registry: SharedRegistry, config: &ClientConfig) -> Self {
        Self {
            fetcher,
            registry,
            authority_url: config.authority_feed_url.clone(),
            council_url: config.council_feed_url.clone(),
            status_reset: config.status_reset(),
            authority: Mutex::new(SourceState::default()),
            council: Mutex::new(SourceState::default()),
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    fn state(&self, source: FeedSource) -> &Mutex<SourceState> {
        match source {
            FeedSource::Authority => &self.authority,
            FeedSource::Council => &self.council,
        }
    }

    fn url(&self, source: FeedSource) -> &str {
        match source {
            FeedSource::Authority => &self.authority_url,
            FeedSource::Council => &self.council_url,
        }
    }

    /// Refresh both sources concurrently.
    pub async fn refresh_all(&self) -> RefreshReport {
        let (authority, council) = tokio::join!(
            self.refresh_source(FeedSource::Authority),
            self.refresh_source(FeedSource::Council),
        );
        RefreshReport { authority, council }
    }

    /// Fetch, parse and apply one source, recording its status.
    pub async fn refresh_source(&self, source: FeedSource) -> Result<RefreshOutcome> {
        let result = self.try_refresh(source).await;

        let mut state = self.state(source).lock().await;
        match &result {
            Ok(_) => state.failure = None,
            Err(err) => {
                tracing::warn!(source = %source, error = %err, "Feed refresh failed");
                state.failure = Some((Utc::now(), err.to_string()));
            }
        }

        result
    }

    async fn try_refresh(&self, source: FeedSource) -> Result<RefreshOutcome> {
        let url = with_cache_buster(self.url(source), Utc::now())?;
        let bytes = self.fetcher.fetch(&url).await?;
        let batch = match source {
            FeedSource::Authority => parse_authority_feed(&bytes)?,
            FeedSource::Council => parse_council_feed(&bytes)?,
        };

        let last_timestamp = self.state(source).lock().await.last_timestamp;
        if !batch.is_newer_than(last_timestamp) {
            tracing::debug!(source = %source, timestamp = ?batch.timestamp, "Feed unchanged");
            return Ok(RefreshOutcome::Unchanged);
        }

        let FeedBatch {
            timestamp,
            disruptions,
            report,
        } = batch;
        let count = disruptions.len();

        {
            let mut registry = self.registry.write().await;
            match source {
                FeedSource::Authority => registry.clear(),
                FeedSource::Council => {
                    registry.clear_source(FeedSource::Council);
                }
            }
            registry.extend(disruptions);
        }

        {
            let mut state = self.state(source).lock().await;
            state.last_timestamp = timestamp;
            state.last_updated = Some(timestamp.unwrap_or_else(Utc::now));
        }

        // The authority pass wiped council records too; accept the next
        // council payload even if its timestamp has not moved.
        if source == FeedSource::Authority {
            self.council.lock().await.last_timestamp = None;
        }

        tracing::info!(source = %source, disruptions = count, report = %report, "Feed applied");

        Ok(RefreshOutcome::Applied {
            disruptions: count,
            report,
        })
    }

    pub async fn status(&self, source: FeedSource) -> FeedStatus {
        self.status_at(source, Utc::now()).await
    }

    pub async fn status_at(&self, source: FeedSource, now: DateTime<Utc>) -> FeedStatus {
        self.state(source).lock().await.status(now, self.status_reset)
    }

    /// Refresh immediately, then every `interval`, forever.
    pub async fn run(&self, interval: Duration) {
        self.run_with(interval, |report| {
            for (source, result) in report.iter() {
                if let Ok(RefreshOutcome::Applied { disruptions, .. }) = result {
                    tracing::debug!(source = %source, disruptions, "Refresh cycle applied");
                }
            }
        })
        .await
    }

    /// Like [`run`](Self::run), calling `on_cycle` after every pass.
    pub async fn run_with(&self, interval: Duration, mut on_cycle: impl FnMut(&RefreshReport)) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = self.refresh_all().await;
            on_cycle(&report);
        }
    }
}
