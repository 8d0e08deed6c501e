//! Batch Scheduler
//!
//! Prices every item of a vendor concurrently. Each item gets its own task;
//! all tasks of a batch share one rate limiter so the market API sees at most
//! one request per configured interval. Outcomes are streamed back as items
//! finish, in completion order.

use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::{FutureExt, Stream};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use wfm_core::{FetchOutcome, Item, ItemError, MarketSummary, StatFetcher, Vendor};

use crate::aggregator::aggregate;
use crate::rate_limiter::RateLimiter;

/// Default spacing between market requests (3 per second)
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(334);

/// Configuration for the batch scheduler
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Minimum time between two market requests within a batch
    pub rate_limit: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

/// Lifecycle of a single item task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Pending,
    Throttled,
    Fetching,
    Aggregating,
    Succeeded,
    Failed,
}

/// Fans out one pricing task per vendor item
#[derive(Clone)]
pub struct BatchScheduler {
    fetcher: Arc<dyn StatFetcher>,
    config: BatchConfig,
}

impl BatchScheduler {
    pub fn new(fetcher: Arc<dyn StatFetcher>, config: BatchConfig) -> Self {
        Self { fetcher, config }
    }

    /// Start pricing every item of `vendor`
    ///
    /// Must be called from within a tokio runtime. Tasks start immediately;
    /// the returned [`BatchRun`] yields exactly one outcome per item and then
    /// ends. A successful item has its market summary updated before its
    /// outcome is published; a failed item keeps its previous summary.
    pub fn run(&self, vendor: &Vendor) -> BatchRun {
        let total = vendor.items.len();
        let limiter = Arc::new(RateLimiter::new(self.config.rate_limit, &vendor.name));
        let (outcome_tx, outcome_rx) = mpsc::channel(total.max(1));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        info!(
            "Pricing {} items for {} ({:?} between requests)",
            total, vendor.name, self.config.rate_limit
        );

        let mut tasks = JoinSet::new();
        for item in &vendor.items {
            let item = Arc::clone(item);
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = Arc::clone(&limiter);
            let cancel_rx = cancel_rx.clone();
            tasks.spawn(async move {
                let name = item.name.clone();
                AssertUnwindSafe(price_item(item, fetcher, limiter, cancel_rx))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        let reason = panic_message(panic.as_ref());
                        warn!("Pricing task for {} panicked: {}", name, reason);
                        FetchOutcome::failure(name, ItemError::TaskFailed(reason))
                    })
            });
        }

        let vendor_name = vendor.name.clone();
        let batch_limiter = limiter;
        tokio::spawn(async move {
            let mut succeeded = 0usize;
            let mut failed = 0usize;

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(outcome) => {
                        if outcome.is_success() {
                            succeeded += 1;
                        } else {
                            failed += 1;
                        }
                        // Receiver gone means nobody is listening any more
                        let _ = outcome_tx.send(outcome).await;
                    }
                    Err(e) => warn!("Pricing task for {} did not finish: {}", vendor_name, e),
                }
            }

            info!(
                "Finished pricing {}: {} succeeded, {} failed",
                vendor_name, succeeded, failed
            );
            debug!("Rate limiter usage: {:?}", batch_limiter.stats());
        });

        BatchRun {
            vendor_name: vendor.name.clone(),
            total,
            outcomes: outcome_rx,
            cancel: CancelHandle(Arc::new(cancel_tx)),
        }
    }
}

/// Run one item through limiter, fetch and aggregation
async fn price_item(
    item: Arc<Item>,
    fetcher: Arc<dyn StatFetcher>,
    limiter: Arc<RateLimiter>,
    mut cancel_rx: watch::Receiver<bool>,
) -> FetchOutcome {
    log_state(&item, TaskState::Pending);

    let result = tokio::select! {
        biased;
        _ = cancelled(&mut cancel_rx) => Err(ItemError::Cancelled),
        result = fetch_summary(&item, fetcher.as_ref(), &limiter) => result,
    };

    match result {
        Ok(summary) => {
            item.set_market(summary);
            log_state(&item, TaskState::Succeeded);
            debug!(
                "Priced {}: weighted avg price {:.2}, avg volume {:.2}",
                item.name, summary.weighted_avg_price, summary.avg_volume
            );
            FetchOutcome::success(item.name.clone(), summary)
        }
        Err(e) => {
            log_state(&item, TaskState::Failed);
            debug!("Failed to price {}: {}", item.name, e);
            FetchOutcome::failure(item.name.clone(), e)
        }
    }
}

async fn fetch_summary(
    item: &Item,
    fetcher: &dyn StatFetcher,
    limiter: &RateLimiter,
) -> Result<MarketSummary, ItemError> {
    log_state(item, TaskState::Throttled);
    limiter.acquire().await;

    log_state(item, TaskState::Fetching);
    let points = fetcher.fetch(&item.name).await?;

    log_state(item, TaskState::Aggregating);
    Ok(aggregate(&points, item.kind)?)
}

/// Resolves once the batch is explicitly cancelled
///
/// Dropping every handle closes the channel without cancelling; tasks then
/// run to completion.
async fn cancelled(cancel_rx: &mut watch::Receiver<bool>) {
    if cancel_rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn log_state(item: &Item, state: TaskState) {
    tracing::trace!(item = %item.name, state = ?state, "item task state");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Cancels the outstanding work of one batch
///
/// Items still waiting for a slot or a response finish with
/// [`ItemError::Cancelled`]. Dropping the [`BatchRun`] does not cancel: its
/// items are still priced, only their outcomes go unread.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

/// Stream of outcomes for one running batch
///
/// Yields outcomes in completion order and ends after the last item. Use
/// [`BatchRun::recv`] directly or treat it as a [`futures::Stream`].
#[derive(Debug)]
pub struct BatchRun {
    vendor_name: String,
    total: usize,
    outcomes: mpsc::Receiver<FetchOutcome>,
    cancel: CancelHandle,
}

impl BatchRun {
    /// Next finished item, or `None` once every item has reported
    pub async fn recv(&mut self) -> Option<FetchOutcome> {
        self.outcomes.recv().await
    }

    /// Drain the remaining outcomes
    pub async fn collect(mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(self.total);
        while let Some(outcome) = self.recv().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }

    /// Number of outcomes this batch produces in total
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl Stream for BatchRun {
    type Item = FetchOutcome;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().outcomes.poll_recv(cx)
    }
}
