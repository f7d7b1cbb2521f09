//! Row Cache
//!
//! Sparse mapping from absolute row index to record, holding only the most
//! recently fetched window. Every `set` replaces the previous contents.

use crate::domain::{FetchRange, Record, RowIndex};
use ahash::AHashMap;

/// Rows of the last fetched window
#[derive(Clone, Debug, Default)]
pub struct RowCache {
    /// Window actually held (clamped to the rows the store returned)
    window: Option<FetchRange>,
    rows: AHashMap<RowIndex, Record>,
}

impl RowCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the records of a window
    ///
    /// Records are keyed by `range.start + offset`; a short response (end of
    /// the dataset) shrinks the held window accordingly.
    pub fn set(&mut self, range: FetchRange, records: Vec<Record>) {
        let held = records.len().min(range.size);

        let mut rows = AHashMap::with_capacity(held);
        rows.extend(
            records
                .into_iter()
                .take(held)
                .enumerate()
                .map(|(offset, record)| (range.start + offset, record)),
        );

        self.rows = rows;
        self.window = (held > 0).then(|| FetchRange::new(range.start, held));
    }

    /// Record at an absolute index
    pub fn get(&self, index: RowIndex) -> Option<&Record> {
        self.rows.get(&index)
    }

    /// Window currently held
    pub fn window(&self) -> Option<FetchRange> {
        self.window
    }

    /// Whether every index of `range` is held
    pub fn covers(&self, range: &FetchRange) -> bool {
        self.window.is_some_and(|w| w.covers(range))
    }

    /// Number of cached rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.rows = AHashMap::new();
        self.window = None;
    }

    /// First record held, in index order
    pub fn first_record(&self) -> Option<&Record> {
        self.window.and_then(|w| self.rows.get(&w.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(ids: std::ops::Range<usize>) -> Vec<Record> {
        ids.map(|id| serde_json::from_value(json!({ "id": id })).expect("record"))
            .collect()
    }

    #[test]
    fn test_set_keys_by_absolute_index() {
        let mut cache = RowCache::new();
        cache.set(FetchRange::new(1980, 53), records(1980..2033));

        assert_eq!(cache.len(), 53);
        assert_eq!(cache.get(1980).and_then(Record::id), Some(1980));
        assert_eq!(cache.get(2032).and_then(Record::id), Some(2032));
        assert!(cache.get(1979).is_none());
        assert!(cache.get(2033).is_none());
        assert_eq!(cache.window(), Some(FetchRange::new(1980, 53)));
    }

    #[test]
    fn test_set_replaces_previous_window() {
        let mut cache = RowCache::new();
        cache.set(FetchRange::new(0, 50), records(0..50));
        cache.set(FetchRange::new(500, 50), records(500..550));

        assert_eq!(cache.len(), 50);
        assert!(cache.get(0).is_none());
        assert!(cache.get(49).is_none());
        assert!(cache.get(500).is_some());
    }

    #[test]
    fn test_short_response_shrinks_window() {
        let mut cache = RowCache::new();
        cache.set(FetchRange::new(990, 50), records(990..1000));

        assert_eq!(cache.window(), Some(FetchRange::new(990, 10)));
        assert!(cache.covers(&FetchRange::new(992, 8)));
        assert!(!cache.covers(&FetchRange::new(990, 50)));
    }

    #[test]
    fn test_extra_records_are_ignored() {
        let mut cache = RowCache::new();
        cache.set(FetchRange::new(0, 3), records(0..10));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_empty_set_and_clear() {
        let mut cache = RowCache::new();
        cache.set(FetchRange::new(0, 50), records(0..50));
        cache.set(FetchRange::new(0, 50), Vec::new());
        assert!(cache.is_empty());
        assert_eq!(cache.window(), None);

        cache.set(FetchRange::new(0, 5), records(0..5));
        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.covers(&FetchRange::new(0, 1)));
    }

    #[test]
    fn test_size_stays_bounded_across_windows() {
        let mut cache = RowCache::new();
        for start in (0..10_000).step_by(37) {
            cache.set(FetchRange::new(start, 53), records(start..start + 53));
            assert!(cache.len() <= 53);
        }
    }
}
