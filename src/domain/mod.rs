//! Domain - Pure Data Structures and Protocol Types
//!
//! These types don't depend on GPUI and represent the browsing domain.

pub mod config;
pub mod page;
pub mod range;
pub mod record;

pub use config::{StoreConfig, ViewerConfig};
pub use page::{CollectionInfo, RangePage};
pub use range::{FetchRange, RangeQuery, RowIndex, VisibleRange};
pub use record::{FieldMap, Record};
