//! Table State
//!
//! UI-thread side of the viewport controller. Holds the latest snapshot, the
//! local scroll metrics and the column layout, and turns them into a
//! [`TableBody`] for the view.
//!
//! Scrolling is applied locally first so rows move without waiting for the
//! controller; the controller only decides what to fetch.

use crate::domain::ViewerConfig;
use crate::viewport::{
    ColumnLayout, TableBody, TableGeometry, ViewportHandle, ViewportMetrics, ViewportSnapshot,
    ViewportTracker,
};
use gpui::{Context, Task};
use std::sync::Arc;

/// Minimum pixel change worth forwarding to the controller
const METRIC_EPSILON: f32 = 0.5;

/// Table loading state
#[derive(Debug, Clone, PartialEq)]
pub enum TableLoadState {
    /// No collection selected
    NoCollection,
    /// Waiting for the first total count
    Loading,
    /// Total count known, collection has rows
    Ready,
    /// Collection has no rows
    Empty,
    /// Nothing could be loaded
    Error(Arc<str>),
}

impl TableLoadState {
    /// Check if currently loading
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if rows can be drawn
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// State entity behind the table view
pub struct TableState {
    handle: ViewportHandle,
    snapshot: Arc<ViewportSnapshot>,

    // ====== Geometry ======
    tracker: ViewportTracker,
    geometry: TableGeometry,
    columns: ColumnLayout,
    metrics: ViewportMetrics,
    header_height: f32,

    /// Snapshot pump; dropping it stops the updates
    _pump: Task<()>,
}

impl TableState {
    /// Create the state and start pumping controller snapshots
    pub fn new(handle: ViewportHandle, config: &ViewerConfig, cx: &mut Context<Self>) -> Self {
        let mut snapshots = handle.subscribe();
        let snapshot = snapshots.borrow_and_update().clone();

        let pump = cx.spawn(async move |this, cx| {
            while snapshots.changed().await.is_ok() {
                let snapshot = snapshots.borrow_and_update().clone();
                if this
                    .update(cx, |state, cx| state.apply_snapshot(snapshot, cx))
                    .is_err()
                {
                    break;
                }
            }
            tracing::debug!("Snapshot pump stopped");
        });

        Self {
            handle,
            snapshot,
            tracker: ViewportTracker::new(config.row_height, config.overscan),
            geometry: TableGeometry::new(config.row_height),
            columns: ColumnLayout::new(config.default_column_width, config.min_column_width),
            metrics: ViewportMetrics::default(),
            header_height: config.header_height,
            _pump: pump,
        }
    }

    fn apply_snapshot(&mut self, snapshot: Arc<ViewportSnapshot>, cx: &mut Context<Self>) {
        if snapshot.collection != self.snapshot.collection {
            self.columns.reset();
            self.metrics.scroll_offset = 0.0;
        }

        if !self.columns.is_derived() {
            if let Some(record) = snapshot.cache.first_record() {
                if self.columns.derive_from(record) {
                    tracing::debug!(columns = self.columns.len(), "Derived column layout");
                }
            }
        }

        self.snapshot = snapshot;
        cx.notify();
    }

    // ==================== Getters ====================

    /// Latest controller snapshot
    pub fn snapshot(&self) -> &Arc<ViewportSnapshot> {
        &self.snapshot
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn row_height(&self) -> f32 {
        self.geometry.row_height()
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    /// Local scroll metrics
    pub fn metrics(&self) -> ViewportMetrics {
        self.metrics
    }

    /// Height of the whole dataset, loaded or not
    pub fn total_height(&self) -> f32 {
        self.snapshot
            .total_count
            .map_or(0.0, |total| self.geometry.total_height(total))
    }

    pub fn load_state(&self) -> TableLoadState {
        let snapshot = &self.snapshot;
        match (&snapshot.collection, snapshot.total_count, &snapshot.error) {
            (None, _, _) => TableLoadState::NoCollection,
            (Some(_), None, Some(error)) => TableLoadState::Error(error.clone()),
            (Some(_), None, None) => TableLoadState::Loading,
            (Some(_), Some(0), _) => TableLoadState::Empty,
            (Some(_), Some(_), _) => TableLoadState::Ready,
        }
    }

    /// Rows to draw for the current local metrics
    pub fn body(&self) -> TableBody {
        let total = self.snapshot.total_count;
        let tracked = total.and_then(|total| self.tracker.track(self.metrics, total));
        self.geometry.layout(total, tracked, &self.snapshot.cache)
    }

    // ==================== Setters ====================

    /// Scroll position reported by the body
    pub fn set_scroll_offset(&mut self, offset: f32, cx: &mut Context<Self>) {
        let offset = match self.snapshot.total_count {
            Some(total) => self
                .tracker
                .clamp_scroll_offset(offset, self.metrics.viewport_height, total),
            None => offset.max(0.0),
        };
        if (offset - self.metrics.scroll_offset).abs() < METRIC_EPSILON {
            return;
        }

        self.metrics.scroll_offset = offset;
        if let Err(e) = self.handle.scroll_to(offset) {
            tracing::warn!(error = %e, "Failed to forward scroll offset");
        }
        cx.notify();
    }

    /// Body height reported by layout
    pub fn set_viewport_height(&mut self, height: f32, cx: &mut Context<Self>) {
        let height = height.max(0.0);
        if (height - self.metrics.viewport_height).abs() < METRIC_EPSILON {
            return;
        }

        self.metrics.viewport_height = height;
        if let Err(e) = self.handle.resize(height) {
            tracing::warn!(error = %e, "Failed to forward viewport height");
        }
        cx.notify();
    }

    /// Drag a column edge; never triggers a fetch
    pub fn resize_column(&mut self, index: usize, delta: f32, cx: &mut Context<Self>) {
        if self.columns.resize(index, delta).is_some() {
            cx.notify();
        }
    }

    /// Switch to another collection
    pub fn open_collection(&mut self, collection: &str, cx: &mut Context<Self>) {
        self.columns.reset();
        self.metrics.scroll_offset = 0.0;
        if let Err(e) = self.handle.open(collection) {
            tracing::warn!(error = %e, collection, "Failed to open collection");
        }
        cx.notify();
    }

    /// Forget everything and reload the current collection
    pub fn refresh(&mut self, cx: &mut Context<Self>) {
        self.columns.reset();
        self.metrics.scroll_offset = 0.0;
        if let Err(e) = self.handle.refresh() {
            tracing::warn!(error = %e, "Failed to refresh collection");
        }
        cx.notify();
    }
}
