//! Column Layout
//!
//! Column ids, labels and widths, derived from the first non-empty page and
//! kept independent of row data. Resizing only touches widths and never asks
//! for data.

use crate::domain::Record;
use std::sync::Arc;

/// One table column, bound to a record field
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Field the column reads
    pub field: Arc<str>,
    /// Header label
    pub label: Arc<str>,
    /// Width in pixels
    pub width: f32,
}

/// Ordered column set with pixel geometry
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnLayout {
    columns: Vec<Column>,
    default_width: f32,
    min_width: f32,
}

impl ColumnLayout {
    pub fn new(default_width: f32, min_width: f32) -> Self {
        let min_width = if min_width.is_finite() && min_width > 0.0 { min_width } else { 1.0 };
        Self {
            columns: Vec::new(),
            default_width: default_width.max(min_width),
            min_width,
        }
    }

    /// Whether columns have been derived yet
    pub fn is_derived(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Derive columns from a record's fields, once
    ///
    /// Later records never change the column set: missing fields render empty
    /// and extra fields are not shown. Returns true when columns were derived.
    pub fn derive_from(&mut self, record: &Record) -> bool {
        if self.is_derived() || record.is_empty() {
            return false;
        }

        self.columns = record
            .field_names()
            .map(|name| Column {
                field: name.into(),
                label: name.into(),
                width: self.default_width,
            })
            .collect();
        true
    }

    /// Forget the columns (collection change)
    pub fn reset(&mut self) {
        self.columns.clear();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Left edge of every column
    pub fn left_offsets(&self) -> Vec<f32> {
        self.columns
            .iter()
            .scan(0.0_f32, |left, col| {
                let this = *left;
                *left += col.width;
                Some(this)
            })
            .collect()
    }

    /// Sum of all column widths
    pub fn total_width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Apply a drag delta to a column, returning its new width
    pub fn resize(&mut self, index: usize, delta: f32) -> Option<f32> {
        let min_width = self.min_width;
        let column = self.columns.get_mut(index)?;
        if delta.is_finite() {
            column.width = (column.width + delta).max(min_width);
        }
        Some(column.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).expect("record")
    }

    #[test]
    fn test_derive_in_field_order() {
        let mut layout = ColumnLayout::new(100.0, 40.0);
        assert!(layout.derive_from(&record(json!({ "id": 1, "name": "a", "score": 3 }))));

        let fields: Vec<_> = layout.columns().iter().map(|c| c.field.to_string()).collect();
        assert_eq!(fields, vec!["id", "name", "score"]);
        assert_eq!(layout.left_offsets(), vec![0.0, 100.0, 200.0]);
        assert_eq!(layout.total_width(), 300.0);
    }

    #[test]
    fn test_columns_stay_stable_under_schema_drift() {
        let mut layout = ColumnLayout::new(100.0, 40.0);
        assert!(!layout.derive_from(&record(json!({}))));
        assert!(layout.derive_from(&record(json!({ "id": 1, "name": "a" }))));
        assert!(!layout.derive_from(&record(json!({ "id": 2, "extra": true }))));

        let fields: Vec<_> = layout.columns().iter().map(|c| c.field.to_string()).collect();
        assert_eq!(fields, vec!["id", "name"]);

        let drifted = record(json!({ "id": 2, "extra": true }));
        assert_eq!(drifted.cell_text(&layout.columns()[1].field), "");
    }

    #[test]
    fn test_resize_clamps_and_shifts_offsets() {
        let mut layout = ColumnLayout::new(100.0, 40.0);
        layout.derive_from(&record(json!({ "a": 1, "b": 2, "c": 3 })));

        assert_eq!(layout.resize(0, 25.0), Some(125.0));
        assert_eq!(layout.left_offsets(), vec![0.0, 125.0, 225.0]);
        assert_eq!(layout.resize(1, -500.0), Some(40.0));
        assert_eq!(layout.resize(9, 10.0), None);
    }

    #[test]
    fn test_reset_allows_new_derivation() {
        let mut layout = ColumnLayout::new(100.0, 40.0);
        layout.derive_from(&record(json!({ "a": 1 })));
        layout.reset();
        assert!(layout.derive_from(&record(json!({ "b": 1 }))));
        assert_eq!(&*layout.columns()[0].field, "b");
    }
}
