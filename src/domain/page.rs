//! Page - Range Query Responses

use super::record::Record;
use serde::{Deserialize, Serialize};

/// Answer to a range query
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePage {
    /// Records starting at the requested index, at most `size` of them
    pub data: Vec<Record>,
    /// Authoritative total row count at the time of the read
    pub total_count: usize,
}

impl RangePage {
    /// Page for an unknown collection
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the page carries no rows
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A browsable collection offered by a store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    pub id: String,
    #[serde(default)]
    pub total_count: usize,
}
