//! Range Store
//!
//! The contract every backing store satisfies: give `size` records starting at
//! `start`, plus the authoritative total row count.

use crate::domain::{CollectionInfo, RangePage, RangeQuery};
use crate::error::Result;
use futures::future::BoxFuture;

/// Boxed future returned by store operations
pub type StoreFuture<T> = BoxFuture<'static, Result<T>>;

/// A paginated range-query service
///
/// Implementations must:
/// - reject a negative `start` or a `size` outside `1..=max_page_size` with
///   a validation error,
/// - clamp the response to the available records instead of failing when
///   `start + size` runs past the end,
/// - answer an unknown collection with an empty page rather than an error,
/// - read `total_count` fresh on every call.
pub trait RangeStore: Send + Sync + 'static {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Fetch one page of records
    fn fetch_range(&self, query: RangeQuery) -> StoreFuture<RangePage>;

    /// List the collections this store can serve
    fn list_collections(&self) -> StoreFuture<Vec<CollectionInfo>>;
}
