//! Window Calculator
//!
//! Expands the visible range by a fixed buffer into the range to fetch.

use crate::domain::{FetchRange, VisibleRange};

/// Range the controller wants loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesiredWindow {
    /// No data is known yet; the range is a stand-in and is never fetched
    Placeholder(FetchRange),
    /// A window to fetch
    Fetch(FetchRange),
}

impl DesiredWindow {
    /// Range to fetch, if any
    pub fn fetch_range(&self) -> Option<FetchRange> {
        match self {
            DesiredWindow::Fetch(range) => Some(*range),
            DesiredWindow::Placeholder(_) => None,
        }
    }

    /// Underlying range, placeholder or not
    pub fn range(&self) -> FetchRange {
        match self {
            DesiredWindow::Fetch(range) | DesiredWindow::Placeholder(range) => *range,
        }
    }
}

/// Pure mapping from visible rows to a desired fetch window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowCalculator {
    buffer: usize,
    default_page_size: usize,
    max_page_size: usize,
}

impl WindowCalculator {
    pub fn new(buffer: usize, default_page_size: usize, max_page_size: usize) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            buffer,
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// `start = max(0, first - buffer)`, `end = min(total - 1, last + buffer)`,
    /// `size = end - start + 1`, capped at the page limit
    pub fn compute(&self, visible: Option<VisibleRange>, total_count: usize) -> DesiredWindow {
        let placeholder = DesiredWindow::Placeholder(FetchRange::new(0, self.default_page_size));

        let (Some(visible), Some(max_index)) = (visible, total_count.checked_sub(1)) else {
            return placeholder;
        };

        let first = visible.first.min(max_index);
        let last = visible.last.clamp(first, max_index);

        let start = first.saturating_sub(self.buffer);
        let end = last.saturating_add(self.buffer).min(max_index);
        let size = (end - start + 1).min(self.max_page_size);

        DesiredWindow::Fetch(FetchRange::new(start, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc() -> WindowCalculator {
        WindowCalculator::new(20, 50, 1000)
    }

    #[test]
    fn test_middle_window() {
        let window = calc().compute(Some(VisibleRange { first: 2000, last: 2012 }), 50_000);
        assert_eq!(window, DesiredWindow::Fetch(FetchRange::new(1980, 53)));
    }

    #[test]
    fn test_start_clamps_to_zero() {
        let window = calc().compute(Some(VisibleRange { first: 5, last: 17 }), 1000);
        assert_eq!(window, DesiredWindow::Fetch(FetchRange::new(0, 38)));
    }

    #[test]
    fn test_end_clamps_to_last_row() {
        let window = calc().compute(Some(VisibleRange { first: 988, last: 999 }), 1000);
        assert_eq!(window, DesiredWindow::Fetch(FetchRange::new(968, 32)));
        assert_eq!(window.range().last(), Some(999));
    }

    #[test]
    fn test_empty_dataset_is_placeholder() {
        let window = calc().compute(None, 0);
        assert_eq!(window, DesiredWindow::Placeholder(FetchRange::new(0, 50)));
        assert_eq!(window.fetch_range(), None);

        let window = calc().compute(Some(VisibleRange { first: 0, last: 3 }), 0);
        assert!(matches!(window, DesiredWindow::Placeholder(_)));
    }

    #[test]
    fn test_page_cap() {
        let window = WindowCalculator::new(20, 50, 30)
            .compute(Some(VisibleRange { first: 100, last: 140 }), 1000);
        assert_eq!(window, DesiredWindow::Fetch(FetchRange::new(80, 30)));
    }

    #[test]
    fn test_bounds_hold_for_every_offset() {
        let calc = calc();
        for total in [1usize, 2, 7, 50, 999, 50_000] {
            for first in (0..total + 40).step_by(7) {
                let visible = VisibleRange {
                    first,
                    last: first + 12,
                };
                let window = calc.compute(Some(visible), total);
                let DesiredWindow::Fetch(range) = window else {
                    panic!("expected fetch window for total={total}");
                };
                assert!(range.size > 0);
                assert!(range.start + range.size - 1 <= total - 1, "total={total} first={first}");
                assert_eq!(window, calc.compute(Some(visible), total));
            }
        }
    }
}
