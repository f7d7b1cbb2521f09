//! Record - Schema-Flexible Dataset Row

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Field name to value mapping, in the order fields appear in the source
pub type FieldMap = serde_json::Map<String, Value>;

/// A single read-only row of a dataset
///
/// Records are shared between the row cache and rendered frames, so cloning
/// only bumps a reference count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldMap", into = "FieldMap")]
pub struct Record(Arc<FieldMap>);

impl Record {
    /// Create a record from its fields
    pub fn new(fields: FieldMap) -> Self {
        Self(Arc::new(fields))
    }

    /// Store-assigned identifier, when present and integral
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    /// Raw value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field names in source order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display text for a cell
    ///
    /// Missing fields and nulls render empty; nested values render as compact JSON.
    pub fn cell_text(&self, field: &str) -> String {
        match self.0.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(nested) => nested.to_string(),
        }
    }
}

impl From<FieldMap> for Record {
    fn from(fields: FieldMap) -> Self {
        Self::new(fields)
    }
}

impl From<Record> for FieldMap {
    fn from(record: Record) -> Self {
        Arc::unwrap_or_clone(record.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).expect("record")
    }

    #[test]
    fn test_cell_text() {
        let r = record(json!({
            "id": 7,
            "name": "turbine-7",
            "active": true,
            "note": null,
            "tags": ["a", "b"]
        }));

        assert_eq!(r.id(), Some(7));
        assert_eq!(r.cell_text("name"), "turbine-7");
        assert_eq!(r.cell_text("active"), "true");
        assert_eq!(r.cell_text("note"), "");
        assert_eq!(r.cell_text("missing"), "");
        assert_eq!(r.cell_text("tags"), r#"["a","b"]"#);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let r = record(json!({ "zeta": 1, "alpha": 2, "id": 3 }));
        let names: Vec<_> = r.field_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "id"]);
    }

    #[test]
    fn test_non_object_is_rejected() {
        let parsed: Result<Record, _> = serde_json::from_value(json!([1, 2, 3]));
        assert!(parsed.is_err());
    }
}
