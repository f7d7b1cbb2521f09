//! Viewport Controller
//!
//! Owns the fetch state machine on a tokio task and publishes snapshots.
//!
//! ```text
//!  ViewportHandle ──(mpsc)──▶ ViewportController::run ──(watch)──▶ TableState
//!                                  │        ▲
//!                       sleep_until│        │FuturesUnordered
//!                                  ▼        │
//!                            DebouncedFetcher ──▶ RangeStoreClient
//! ```
//!
//! The loop is the only owner of the fetcher, so no locking is involved.
//! Dropping every handle closes the command channel, which ends the loop and
//! drops any outstanding fetch futures.

use crate::domain::{RangePage, ViewerConfig};
use crate::error::{Error, Result};
use crate::services::RangeStoreClient;
use crate::viewport::cache::RowCache;
use crate::viewport::fetcher::{DataOutcome, DataTicket, DebouncedFetcher, FetchPhase, ProbeTicket};
use crate::viewport::tracker::{TrackedRows, ViewportMetrics, ViewportTracker};
use crate::viewport::window::{DesiredWindow, WindowCalculator};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

/// Input to the controller loop
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportCommand {
    /// New scroll offset in pixels
    Scroll(f32),
    /// New viewport body height in pixels
    Resize(f32),
    /// Switch to another collection
    Open(Arc<str>),
    /// Re-probe the current collection from scratch
    Refresh,
}

/// Everything the UI needs to draw one frame
#[derive(Clone, Debug)]
pub struct ViewportSnapshot {
    pub collection: Option<Arc<str>>,
    /// Metrics with the scroll offset clamped to the dataset
    pub metrics: ViewportMetrics,
    pub total_count: Option<usize>,
    pub tracked: Option<TrackedRows>,
    pub desired: Option<DesiredWindow>,
    pub phase: FetchPhase,
    pub cache: Arc<RowCache>,
    /// Last fetch error, cleared by the next success
    pub error: Option<Arc<str>>,
}

impl ViewportSnapshot {
    fn initial(collection: Option<Arc<str>>, metrics: ViewportMetrics) -> Self {
        Self {
            collection,
            metrics,
            total_count: None,
            tracked: None,
            desired: None,
            phase: FetchPhase::Idle,
            cache: Arc::new(RowCache::new()),
            error: None,
        }
    }
}

/// Cloneable handle for driving a running controller
#[derive(Clone, Debug)]
pub struct ViewportHandle {
    commands: mpsc::UnboundedSender<ViewportCommand>,
    snapshots: watch::Receiver<Arc<ViewportSnapshot>>,
}

impl ViewportHandle {
    pub fn scroll_to(&self, offset: f32) -> Result<()> {
        self.send(ViewportCommand::Scroll(offset))
    }

    pub fn resize(&self, viewport_height: f32) -> Result<()> {
        self.send(ViewportCommand::Resize(viewport_height))
    }

    pub fn open(&self, collection: impl Into<Arc<str>>) -> Result<()> {
        self.send(ViewportCommand::Open(collection.into()))
    }

    pub fn refresh(&self) -> Result<()> {
        self.send(ViewportCommand::Refresh)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<ViewportSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// A receiver that wakes on every new snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewportSnapshot>> {
        self.snapshots.clone()
    }

    fn send(&self, command: ViewportCommand) -> Result<()> {
        self.commands.send(command).map_err(|_| Error::ChannelClosed {
            message: "viewport controller stopped".to_string(),
        })
    }
}

enum Completion {
    Data(DataTicket, Result<RangePage>),
    Probe(ProbeTicket, Result<usize>),
}

/// The sliding-window controller loop
pub struct ViewportController {
    tracker: ViewportTracker,
    calculator: WindowCalculator,
    fetcher: DebouncedFetcher,
    client: RangeStoreClient,

    // ====== View State ======
    collection: Option<Arc<str>>,
    metrics: ViewportMetrics,
    tracked: Option<TrackedRows>,
    desired: Option<DesiredWindow>,

    // ====== Channels ======
    commands: mpsc::UnboundedReceiver<ViewportCommand>,
    snapshots: watch::Sender<Arc<ViewportSnapshot>>,
    pending: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl ViewportController {
    /// Create a controller and the handle that drives it
    pub fn new(
        config: &ViewerConfig,
        client: RangeStoreClient,
        collection: Option<Arc<str>>,
    ) -> (Self, ViewportHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let metrics = ViewportMetrics::default();
        let (snapshot_tx, snapshot_rx) =
            watch::channel(Arc::new(ViewportSnapshot::initial(collection.clone(), metrics)));

        let controller = Self {
            tracker: ViewportTracker::new(config.row_height, config.overscan),
            calculator: WindowCalculator::new(
                config.buffer_size,
                config.default_page_size,
                config.max_page_size,
            ),
            fetcher: DebouncedFetcher::new(config.debounce()),
            client,
            collection,
            metrics,
            tracked: None,
            desired: None,
            commands: command_rx,
            snapshots: snapshot_tx,
            pending: FuturesUnordered::new(),
        };
        let handle = ViewportHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (controller, handle)
    }

    /// Run until every handle is dropped
    pub async fn run(mut self) {
        if self.collection.is_some() {
            self.start_probe();
        }
        self.publish();

        loop {
            let deadline = self.fetcher.deadline();
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                () = wait_deadline(deadline) => self.fire_deadline(),
                Some(completion) = self.pending.next(), if !self.pending.is_empty() => {
                    self.complete(completion)
                }
            }
            self.publish();
        }

        debug!(
            collection = ?self.collection,
            outstanding = self.pending.len(),
            "Viewport controller stopped"
        );
    }

    fn handle_command(&mut self, command: ViewportCommand) {
        match command {
            ViewportCommand::Scroll(offset) => {
                self.metrics.scroll_offset = offset;
                self.recompute();
            }
            ViewportCommand::Resize(height) => {
                self.metrics.viewport_height = height;
                self.recompute();
            }
            ViewportCommand::Open(collection) => {
                if self.collection.as_deref() != Some(&*collection) {
                    info!(%collection, "Opening collection");
                    self.collection = Some(collection);
                    self.reset();
                }
            }
            ViewportCommand::Refresh => {
                if self.collection.is_some() {
                    info!(collection = ?self.collection, "Refreshing collection");
                    self.reset();
                }
            }
        }
    }

    fn reset(&mut self) {
        self.fetcher.reset();
        self.metrics.scroll_offset = 0.0;
        self.tracked = None;
        self.desired = None;
        self.start_probe();
    }

    /// Re-derive tracked rows and the desired window from current metrics
    fn recompute(&mut self) {
        let Some(total) = self.fetcher.total_count() else {
            self.tracked = None;
            self.desired = None;
            self.fetcher.set_desired(None, Instant::now());
            return;
        };

        self.metrics.scroll_offset = self.tracker.clamp_scroll_offset(
            self.metrics.scroll_offset,
            self.metrics.viewport_height,
            total,
        );
        self.tracked = self.tracker.track(self.metrics, total);
        let desired = self
            .calculator
            .compute(self.tracked.map(|rows| rows.visible), total);
        self.desired = Some(desired);

        if self.fetcher.set_desired(desired.fetch_range(), Instant::now()) {
            debug!(window = %desired.range(), "Desired window changed, debouncing");
        }
    }

    fn start_probe(&mut self) {
        let Some(collection) = self.collection.clone() else {
            return;
        };
        let ticket = self.fetcher.begin_probe();
        let request = self.client.probe_total(collection);
        self.pending
            .push(async move { Completion::Probe(ticket, request.await) }.boxed());
    }

    fn fire_deadline(&mut self) {
        let Some(ticket) = self.fetcher.fire_timer() else {
            return;
        };
        let Some(collection) = self.collection.clone() else {
            return;
        };
        let request = self.client.fetch_window(collection, ticket.range);
        self.pending
            .push(async move { Completion::Data(ticket, request.await) }.boxed());
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Data(ticket, result) => {
                // A failure waits for the next scroll; anything else may have
                // left the desired window uncovered
                if self.fetcher.on_data_response(ticket, result) != DataOutcome::Failed {
                    self.recompute();
                }
            }
            Completion::Probe(ticket, result) => {
                if self.fetcher.on_probe_response(ticket, result) {
                    debug!(total = ?self.fetcher.total_count(), "Total count updated");
                }
                self.recompute();
            }
        }
    }

    fn publish(&self) {
        let snapshot = ViewportSnapshot {
            collection: self.collection.clone(),
            metrics: self.metrics,
            total_count: self.fetcher.total_count(),
            tracked: self.tracked,
            desired: self.desired,
            phase: self.fetcher.phase(),
            cache: self.fetcher.cache().clone(),
            error: self.fetcher.last_error().cloned(),
        };
        self.snapshots.send_replace(Arc::new(snapshot));
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
