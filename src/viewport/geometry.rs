//! Geometry / Render Model
//!
//! Turns tracked rows and the row cache into positioned row slots. The full
//! dataset height is always laid out, whether or not its rows are loaded, so
//! the scrollbar reflects the whole collection.

use crate::domain::{Record, RowIndex};
use crate::viewport::cache::RowCache;
use crate::viewport::tracker::TrackedRows;

/// A row to draw at an absolute vertical offset
#[derive(Clone, Debug, PartialEq)]
pub enum RowSlot {
    /// Cached record
    Loaded {
        index: RowIndex,
        top: f32,
        record: Record,
    },
    /// Skeleton row with the same geometry, for rows not (yet) cached
    Placeholder { index: RowIndex, top: f32 },
}

impl RowSlot {
    pub fn index(&self) -> RowIndex {
        match self {
            RowSlot::Loaded { index, .. } | RowSlot::Placeholder { index, .. } => *index,
        }
    }

    pub fn top(&self) -> f32 {
        match self {
            RowSlot::Loaded { top, .. } | RowSlot::Placeholder { top, .. } => *top,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RowSlot::Placeholder { .. })
    }
}

/// What the table body shows
#[derive(Clone, Debug, PartialEq)]
pub enum TableBody {
    /// Total count not known yet
    Loading,
    /// The collection has no rows
    Empty,
    /// Rows in render order
    Rows(Vec<RowSlot>),
}

/// Fixed-row-height geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableGeometry {
    row_height: f32,
}

impl TableGeometry {
    pub fn new(row_height: f32) -> Self {
        Self { row_height }
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// `totalCount × rowHeight`
    pub fn total_height(&self, total_count: usize) -> f32 {
        total_count as f32 * self.row_height
    }

    /// Absolute top of a row
    pub fn row_top(&self, index: RowIndex) -> f32 {
        index as f32 * self.row_height
    }

    /// Lay out the rendered rows, substituting placeholders for uncached ones
    pub fn layout(
        &self,
        total_count: Option<usize>,
        tracked: Option<TrackedRows>,
        cache: &RowCache,
    ) -> TableBody {
        match (total_count, tracked) {
            (None, _) => TableBody::Loading,
            (Some(0), _) | (Some(_), None) => TableBody::Empty,
            (Some(_), Some(tracked)) => TableBody::Rows(
                tracked
                    .rendered
                    .indices()
                    .map(|index| {
                        let top = self.row_top(index);
                        match cache.get(index) {
                            Some(record) => RowSlot::Loaded {
                                index,
                                top,
                                record: record.clone(),
                            },
                            None => RowSlot::Placeholder { index, top },
                        }
                    })
                    .collect(),
            ),
        }
    }
}
