//! Periodic refresh of the price store from every configured feed.

use futures::future::join;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::currency::default_currencies;
use crate::core::{FeedError, FeedProvider};
use crate::store::PriceStore;

/// Receives every feed failure. The scheduler never propagates them.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, feed: &str, error: &FeedError);
}

/// Reports failures as `warn` events.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, feed: &str, error: &FeedError) {
        warn!(feed, error = %error, "Feed refresh failed");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Updated { saved: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutcome {
    pub feed: String,
    pub status: FeedStatus,
}

/// What happened to each feed during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub outcomes: Vec<FeedOutcome>,
}

impl CycleReport {
    pub fn failures(&self) -> impl Iterator<Item = &FeedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FeedStatus::Failed { .. }))
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Drives refresh cycles: both feeds run concurrently, each applies its own quotes as soon
/// as it finishes, and the next cycle starts one interval after both are done.
pub struct RefreshScheduler {
    store: PriceStore,
    feeds: [Arc<dyn FeedProvider>; 2],
    interval: Duration,
    currencies: Arc<HashSet<String>>,
    reporter: Arc<dyn ErrorReporter>,
}

impl RefreshScheduler {
    pub fn new(
        store: PriceStore,
        first: Arc<dyn FeedProvider>,
        second: Arc<dyn FeedProvider>,
        interval: Duration,
    ) -> Self {
        RefreshScheduler {
            store,
            feeds: [first, second],
            interval,
            currencies: Arc::new(default_currencies().into_iter().collect()),
            reporter: Arc::new(LogReporter),
        }
    }

    /// Restricts which codes may reach the store.
    pub fn with_currencies(mut self, currencies: &[String]) -> Self {
        self.currencies = Arc::new(currencies.iter().cloned().collect());
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs one cycle and waits for both feeds, whatever their outcome.
    pub async fn run_cycle(&self) -> CycleReport {
        let [first, second] = &self.feeds;
        let (a, b) = join(self.spawn_refresh(first), self.spawn_refresh(second)).await;

        let outcomes = [(first, a), (second, b)]
            .into_iter()
            .map(|(feed, joined)| {
                let result = joined.unwrap_or_else(|e| Err(FeedError::Aborted(e.to_string())));
                let status = match result {
                    Ok(saved) => FeedStatus::Updated { saved },
                    Err(error) => {
                        self.reporter.report(feed.name(), &error);
                        FeedStatus::Failed {
                            error: error.to_string(),
                        }
                    }
                };
                FeedOutcome {
                    feed: feed.name().to_string(),
                    status,
                }
            })
            .collect();

        CycleReport { outcomes }
    }

    /// Refreshes forever.
    pub async fn run(&self) {
        self.run_until(std::future::pending()).await
    }

    /// Refreshes until `shutdown` resolves. A cycle in flight is abandoned; feed tasks that
    /// were already spawned still finish and apply their quotes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(interval_ms = self.interval.as_millis() as u64, "Refresh loop starting");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Refresh loop stopped");
                    return;
                }
                _ = self.cycle_then_sleep() => {}
            }
        }
    }

    async fn cycle_then_sleep(&self) {
        let report = self.run_cycle().await;
        debug!(
            failures = report.failures().count(),
            "Refresh cycle complete"
        );
        tokio::time::sleep(self.interval).await;
    }

    fn spawn_refresh(&self, feed: &Arc<dyn FeedProvider>) -> JoinHandle<Result<usize, FeedError>> {
        let feed = Arc::clone(feed);
        let store = self.store.clone();
        let currencies = Arc::clone(&self.currencies);
        tokio::spawn(async move { refresh_feed(feed.as_ref(), &store, &currencies).await })
    }
}

/// Fetches from one feed and saves its quotes. Nothing is saved unless the fetch succeeded.
async fn refresh_feed(
    feed: &dyn FeedProvider,
    store: &PriceStore,
    currencies: &HashSet<String>,
) -> Result<usize, FeedError> {
    let result = feed.fetch().await?;
    let mut saved = 0;
    for (code, price) in &result.quotes {
        if !currencies.contains(code) {
            debug!(feed = feed.name(), code = %code, "Dropping unsupported currency");
            continue;
        }
        store.save(code, *price).await;
        saved += 1;
    }
    debug!(
        feed = feed.name(),
        saved,
        conversion = %result.conversion,
        "Applied feed quotes"
    );
    Ok(saved)
}
