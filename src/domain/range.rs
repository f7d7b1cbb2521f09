//! Range - Row Index Ranges and Range Queries

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Zero-based absolute position into a dataset
pub type RowIndex = usize;

/// Contiguous `[start, start + size)` slice of row indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FetchRange {
    pub start: RowIndex,
    pub size: usize,
}

impl FetchRange {
    /// Create a new range
    pub fn new(start: RowIndex, size: usize) -> Self {
        Self { start, size }
    }

    /// One past the last index
    pub fn end(&self) -> RowIndex {
        self.start + self.size
    }

    /// Last index, or `None` for an empty range
    pub fn last(&self) -> Option<RowIndex> {
        self.size.checked_sub(1).map(|n| self.start + n)
    }

    /// Check if an index falls inside the range
    pub fn contains(&self, index: RowIndex) -> bool {
        index >= self.start && index < self.end()
    }

    /// Check if `other` lies entirely inside this range
    pub fn covers(&self, other: &FetchRange) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// As a std range
    pub fn as_range(&self) -> std::ops::Range<RowIndex> {
        self.start..self.end()
    }
}

impl fmt::Display for FetchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{start: {}, size: {}}}", self.start, self.size)
    }
}

/// Inclusive range of row indices, `first <= last`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    pub first: RowIndex,
    pub last: RowIndex,
}

impl VisibleRange {
    /// Number of indices covered
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false, a visible range holds at least one index
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the indices in order
    pub fn indices(&self) -> std::ops::RangeInclusive<RowIndex> {
        self.first..=self.last
    }
}

/// A range query as received at the store boundary
///
/// Parameters stay signed here so that bad input can be rejected with a
/// validation error instead of wrapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeQuery {
    pub collection: Arc<str>,
    pub start: i64,
    pub size: i64,
}

impl RangeQuery {
    /// Create a new query
    pub fn new(collection: impl Into<Arc<str>>, start: i64, size: i64) -> Self {
        Self {
            collection: collection.into(),
            start,
            size,
        }
    }

    /// Build a query for a fetch range
    pub fn for_range(collection: impl Into<Arc<str>>, range: FetchRange) -> Self {
        Self::new(collection, range.start as i64, range.size as i64)
    }

    /// Validate the parameters against the page cap
    pub fn validate(&self, max_page_size: usize) -> Result<FetchRange> {
        if self.start < 0 {
            return Err(Error::validation(format!(
                "start must be >= 0, got {}",
                self.start
            )));
        }
        if self.size <= 0 || self.size as u64 > max_page_size as u64 {
            return Err(Error::validation(format!(
                "size must be between 1 and {max_page_size}, got {}",
                self.size
            )));
        }
        Ok(FetchRange::new(self.start as usize, self.size as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_range_bounds() {
        let r = FetchRange::new(1980, 53);
        assert_eq!(r.end(), 2033);
        assert_eq!(r.last(), Some(2032));
        assert!(r.contains(1980));
        assert!(!r.contains(2033));
        assert!(r.covers(&FetchRange::new(1990, 10)));
        assert!(!r.covers(&FetchRange::new(1990, 50)));
        assert_eq!(FetchRange::new(5, 0).last(), None);
    }

    #[test]
    fn test_query_validation() {
        assert_eq!(
            RangeQuery::new("app", 0, 50).validate(1000).expect("valid"),
            FetchRange::new(0, 50)
        );
        assert!(matches!(
            RangeQuery::new("app", -1, 50).validate(1000),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            RangeQuery::new("app", 0, 0).validate(1000),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            RangeQuery::new("app", 0, 1001).validate(1000),
            Err(Error::Validation { .. })
        ));
        assert!(RangeQuery::new("app", 0, 1000).validate(1000).is_ok());
    }
}
