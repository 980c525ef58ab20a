//! Refresh orchestration
//!
//! `Refresher::run_cycle` is the single entry point for one refresh: load the
//! cache record, prune it, decide between calling the API and serving the
//! cache, then persist. `RefreshHandle` drives cycles from a background task
//! on a timer and on demand, sending results to the UI over a channel.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{self, CacheRecord, CacheStore};
use crate::config::Config;
use crate::data::{FetchError, Monitor, MonitorSource};

/// Unrecoverable outcomes of a refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The request budget is spent and nothing is cached
    #[error("Rate limit exceeded and no cached data available.")]
    RateLimitedNoCache,

    /// The API call failed and nothing is cached
    #[error("Error fetching data and no cached data available.")]
    FetchFailedNoCache,
}

/// Why a cycle answered from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheReason {
    RateLimited,
    FetchFailed,
}

impl CacheReason {
    fn no_cache_error(self) -> RefreshError {
        match self {
            CacheReason::RateLimited => RefreshError::RateLimitedNoCache,
            CacheReason::FetchFailed => RefreshError::FetchFailedNoCache,
        }
    }
}

/// States a refresh cycle moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Init,
    Pruned,
    RateLimited,
    Eligible,
    Fetching,
    FetchOk,
    FetchFailed,
    CacheServed,
    Terminal,
}

impl CycleState {
    fn advance(&mut self, next: CycleState) {
        debug!(from = ?*self, to = ?next, "refresh cycle transition");
        *self = next;
    }
}

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Data came from a successful API call
    Fresh(Vec<Monitor>),
    /// Data came from the persisted cache
    Cached {
        monitors: Vec<Monitor>,
        reason: CacheReason,
    },
    /// No data could be produced
    Failed(RefreshError),
}

impl CycleOutcome {
    /// Monitors produced by the cycle, if any
    pub fn monitors(&self) -> Option<&[Monitor]> {
        match self {
            CycleOutcome::Fresh(monitors) | CycleOutcome::Cached { monitors, .. } => {
                Some(monitors)
            }
            CycleOutcome::Failed(_) => None,
        }
    }

    /// Whether the monitors came from the cache
    pub fn using_cache(&self) -> bool {
        matches!(self, CycleOutcome::Cached { .. })
    }
}

/// What the presentation layer renders after each cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub monitors: Option<Vec<Monitor>>,
    pub error: Option<String>,
    pub using_cache: bool,
}

impl From<CycleOutcome> for Snapshot {
    fn from(outcome: CycleOutcome) -> Self {
        match outcome {
            CycleOutcome::Fresh(monitors) => Snapshot {
                monitors: Some(monitors),
                error: None,
                using_cache: false,
            },
            CycleOutcome::Cached { monitors, .. } => Snapshot {
                monitors: Some(monitors),
                error: None,
                using_cache: true,
            },
            CycleOutcome::Failed(err) => Snapshot {
                monitors: None,
                error: Some(err.to_string()),
                using_cache: false,
            },
        }
    }
}

/// Runs refresh cycles against a monitor source and the cache file
///
/// Holds no state between cycles; everything is reloaded from the cache file.
pub struct Refresher<S> {
    store: CacheStore,
    source: S,
    token: String,
    window_ms: i64,
    max_requests: usize,
    fetch_timeout: Duration,
}

impl<S: MonitorSource> Refresher<S> {
    /// Creates a refresher for `token` using the limits in `config`
    pub fn new(config: &Config, token: String, source: S) -> Self {
        Self {
            store: CacheStore::new(&config.config_dir),
            source,
            token,
            window_ms: config.window_ms(),
            max_requests: config.max_requests,
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Runs one cycle at the current time
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.run_cycle_at(cache::now_millis()).await
    }

    /// Runs one cycle as if the current time were `now` (epoch milliseconds)
    pub async fn run_cycle_at(&self, now: i64) -> CycleOutcome {
        let mut state = CycleState::Init;

        let loaded = self.store.load().await;
        let loaded_count = loaded.timestamps.len();
        let record = cache::prune(loaded, now, self.window_ms);
        let pruned_any = record.timestamps.len() != loaded_count;
        state.advance(CycleState::Pruned);

        if cache::is_limited(&record, self.max_requests) {
            state.advance(CycleState::RateLimited);
            info!(
                requests = record.timestamps.len(),
                max = self.max_requests,
                "rate limited, skipping API call"
            );
            return self
                .serve_cache(&mut state, record, pruned_any, CacheReason::RateLimited)
                .await;
        }

        state.advance(CycleState::Eligible);
        state.advance(CycleState::Fetching);

        let fetched = time::timeout(self.fetch_timeout, self.source.fetch_monitors(&self.token))
            .await
            .unwrap_or(Err(FetchError::Timeout(self.fetch_timeout)));

        match fetched {
            Ok(monitors) => {
                state.advance(CycleState::FetchOk);
                info!(count = monitors.len(), "fetched monitors");
                let updated = cache::record(record, now, monitors.clone());
                self.persist(&updated).await;
                state.advance(CycleState::Terminal);
                CycleOutcome::Fresh(monitors)
            }
            Err(e) => {
                state.advance(CycleState::FetchFailed);
                warn!(error = %e, transport = e.is_transport(), "error fetching data");
                self.serve_cache(&mut state, record, pruned_any, CacheReason::FetchFailed)
                    .await
            }
        }
    }

    /// Answers from the cached dataset, if there is one
    ///
    /// The pruned record is written back only when pruning changed it.
    async fn serve_cache(
        &self,
        state: &mut CycleState,
        record: CacheRecord,
        pruned_any: bool,
        reason: CacheReason,
    ) -> CycleOutcome {
        if pruned_any {
            self.persist(&record).await;
        }

        let outcome = match record.data {
            Some(monitors) => {
                state.advance(CycleState::CacheServed);
                info!(?reason, count = monitors.len(), "using cached data");
                CycleOutcome::Cached { monitors, reason }
            }
            None => {
                let err = reason.no_cache_error();
                warn!(error = %err, "no cached data to fall back to");
                CycleOutcome::Failed(err)
            }
        };

        state.advance(CycleState::Terminal);
        outcome
    }

    async fn persist(&self, record: &CacheRecord) {
        if let Err(e) = self.store.save(record).await {
            warn!(path = %self.store.path().display(), error = %e, "failed to write cache");
        }
    }
}

/// Messages sent from background refresh to main app
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    /// A refresh cycle started
    Started,
    /// A refresh cycle finished with this snapshot
    Completed(Snapshot),
}

/// Handle for controlling the background refresh task
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    trigger_tx: mpsc::Sender<()>,
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the background refresh task
    ///
    /// Runs one cycle immediately, then one per `interval` tick (if any) and
    /// one per `request_refresh` call.
    ///
    /// # Arguments
    /// * `refresher` - Shared refresher used for every cycle
    /// * `interval` - Optional fixed period between automatic cycles
    pub fn spawn<S>(refresher: Arc<Refresher<S>>, interval: Option<Duration>) -> Self
    where
        S: MonitorSource + 'static,
    {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            let mut ticker = interval.map(|period| {
                let mut ticker = time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            });

            if !run_and_report(&refresher, &msg_tx).await {
                return;
            }

            loop {
                tokio::select! {
                    _ = next_tick(&mut ticker) => {}
                    Some(()) = trigger_rx.recv() => {}
                    _ = shutdown_rx.recv() => break,
                }

                if !run_and_report(&refresher, &msg_tx).await {
                    break;
                }
            }

            debug!("background refresh stopped");
        });

        Self {
            receiver: msg_rx,
            trigger_tx,
            shutdown_tx,
        }
    }

    /// Requests an immediate refresh
    ///
    /// A request made while one is already pending is dropped.
    pub fn request_refresh(&self) {
        let _ = self.trigger_tx.try_send(());
    }

    /// Shuts down the background refresh task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Runs one cycle and reports it; returns false once the receiver is gone
async fn run_and_report<S: MonitorSource>(
    refresher: &Refresher<S>,
    tx: &mpsc::Sender<RefreshMessage>,
) -> bool {
    if tx.send(RefreshMessage::Started).await.is_err() {
        return false;
    }
    let snapshot = Snapshot::from(refresher.run_cycle().await);
    tx.send(RefreshMessage::Completed(snapshot)).await.is_ok()
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Checks for pending refresh messages without blocking
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
