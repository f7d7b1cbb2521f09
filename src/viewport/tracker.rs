//! Viewport Tracker
//!
//! Maps scroll position and viewport size to row indices. Pure arithmetic,
//! recomputed synchronously on every scroll or resize.

use crate::domain::VisibleRange;

/// Scroll state of the table body
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    /// Distance scrolled from the top, in pixels
    pub scroll_offset: f32,
    /// Height of the scrollable body, in pixels
    pub viewport_height: f32,
}

impl ViewportMetrics {
    pub fn new(scroll_offset: f32, viewport_height: f32) -> Self {
        Self {
            scroll_offset,
            viewport_height,
        }
    }
}

/// Rows in view for one set of metrics
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackedRows {
    /// Rows intersecting the viewport
    pub visible: VisibleRange,
    /// Visible rows widened by overscan, the rows to render
    pub rendered: VisibleRange,
}

/// Computes visible row indices for a fixed row height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTracker {
    row_height: f32,
    overscan: usize,
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl ViewportTracker {
    /// Create a tracker; non-positive row heights fall back to one pixel
    pub fn new(row_height: f32, overscan: usize) -> Self {
        let row_height = if row_height.is_finite() && row_height > 0.0 {
            row_height
        } else {
            1.0
        };
        Self {
            row_height,
            overscan,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Visible and rendered rows, or `None` for an empty dataset
    ///
    /// `first = floor(offset / rowHeight)`,
    /// `last = ceil((offset + height) / rowHeight)`, clamped to the dataset.
    pub fn track(&self, metrics: ViewportMetrics, total_count: usize) -> Option<TrackedRows> {
        let max_index = total_count.checked_sub(1)?;

        let offset = sanitize(metrics.scroll_offset);
        let height = sanitize(metrics.viewport_height);

        let first = ((offset / self.row_height).floor() as usize).min(max_index);
        let last = (((offset + height) / self.row_height).ceil() as usize)
            .min(max_index)
            .max(first);

        let visible = VisibleRange { first, last };
        let rendered = VisibleRange {
            first: first.saturating_sub(self.overscan),
            last: last.saturating_add(self.overscan).min(max_index),
        };

        Some(TrackedRows { visible, rendered })
    }

    /// Largest valid scroll offset for a dataset
    pub fn max_scroll_offset(&self, viewport_height: f32, total_count: usize) -> f32 {
        (total_count as f32 * self.row_height - sanitize(viewport_height)).max(0.0)
    }

    /// Clamp a scroll offset into `[0, max_scroll_offset]`
    pub fn clamp_scroll_offset(&self, offset: f32, viewport_height: f32, total_count: usize) -> f32 {
        sanitize(offset).min(self.max_scroll_offset(viewport_height, total_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_middle_of_large_dataset() {
        let tracker = ViewportTracker::new(50.0, 5);
        let rows = tracker
            .track(ViewportMetrics::new(100_000.0, 600.0), 50_000)
            .expect("rows");

        assert_eq!(rows.visible, VisibleRange { first: 2000, last: 2012 });
        assert_eq!(rows.rendered, VisibleRange { first: 1995, last: 2017 });
    }

    #[test]
    fn test_track_top_clamps_overscan() {
        let tracker = ViewportTracker::new(50.0, 5);
        let rows = tracker
            .track(ViewportMetrics::new(0.0, 600.0), 1000)
            .expect("rows");

        assert_eq!(rows.visible, VisibleRange { first: 0, last: 12 });
        assert_eq!(rows.rendered, VisibleRange { first: 0, last: 17 });
    }

    #[test]
    fn test_track_end_clamps_to_last_row() {
        let tracker = ViewportTracker::new(50.0, 5);
        let total = 1000;
        let offset = tracker.max_scroll_offset(600.0, total);
        let rows = tracker
            .track(ViewportMetrics::new(offset, 600.0), total)
            .expect("rows");

        assert_eq!(rows.visible.last, 999);
        assert_eq!(rows.rendered.last, 999);
        assert_eq!(rows.visible.first, 988);
    }

    #[test]
    fn test_track_small_dataset_and_overscroll() {
        let tracker = ViewportTracker::new(50.0, 5);
        let rows = tracker
            .track(ViewportMetrics::new(10_000.0, 600.0), 3)
            .expect("rows");
        assert_eq!(rows.visible, VisibleRange { first: 2, last: 2 });

        let rows = tracker
            .track(ViewportMetrics::new(0.0, 600.0), 3)
            .expect("rows");
        assert_eq!(rows.visible, VisibleRange { first: 0, last: 2 });
    }

    #[test]
    fn test_track_empty_dataset() {
        let tracker = ViewportTracker::new(50.0, 5);
        assert!(tracker.track(ViewportMetrics::new(0.0, 600.0), 0).is_none());
    }

    #[test]
    fn test_track_bad_metrics() {
        let tracker = ViewportTracker::new(50.0, 0);
        let rows = tracker
            .track(ViewportMetrics::new(-300.0, f32::NAN), 100)
            .expect("rows");
        assert_eq!(rows.visible, VisibleRange { first: 0, last: 0 });
    }

    #[test]
    fn test_clamp_scroll_offset() {
        let tracker = ViewportTracker::new(50.0, 5);
        assert_eq!(tracker.clamp_scroll_offset(-10.0, 600.0, 100), 0.0);
        assert_eq!(tracker.clamp_scroll_offset(1e9, 600.0, 100), 4400.0);
        assert_eq!(tracker.clamp_scroll_offset(500.0, 600.0, 5), 0.0);
    }
}
