//! Range Store Client
//!
//! Wraps a [`RangeStore`] with the checks the viewport controller relies on:
//! requests are capped at the page limit, responses longer than requested are
//! rejected as malformed, and a not-found collection reads as empty.

use crate::constants::COUNT_PROBE_SIZE;
use crate::domain::{CollectionInfo, FetchRange, RangePage, RangeQuery};
use crate::error::Error;
use crate::services::store::{RangeStore, StoreFuture};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Client used by the viewport controller to talk to the backing store
#[derive(Clone)]
pub struct RangeStoreClient {
    store: Arc<dyn RangeStore>,
    max_page_size: usize,
}

impl RangeStoreClient {
    /// Create a new client
    pub fn new(store: Arc<dyn RangeStore>, max_page_size: usize) -> Self {
        Self {
            store,
            max_page_size: max_page_size.max(1),
        }
    }

    /// Page cap applied to every request
    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Fetch the records of a window
    pub fn fetch_window(&self, collection: Arc<str>, range: FetchRange) -> StoreFuture<RangePage> {
        let range = if range.size > self.max_page_size {
            warn!(
                %range,
                max = self.max_page_size,
                "Window larger than page cap, truncating"
            );
            FetchRange::new(range.start, self.max_page_size)
        } else {
            range
        };

        let query = RangeQuery::for_range(collection.clone(), range);
        let request = self.store.fetch_range(query);
        let store_name = self.store.name().to_string();

        async move {
            let started = Instant::now();
            let page = match request.await {
                Ok(page) => page,
                Err(Error::NotFound { collection }) => {
                    debug!(%collection, "Collection not found, treating as empty");
                    RangePage::empty()
                }
                Err(e) => return Err(e),
            };

            if page.data.len() > range.size {
                return Err(Error::unexpected(format!(
                    "{store_name} returned {} records for a window of {}",
                    page.data.len(),
                    range.size
                )));
            }

            debug!(
                store = %store_name,
                %collection,
                %range,
                rows = page.data.len(),
                total = page.total_count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetched window"
            );
            Ok(page)
        }
        .boxed()
    }

    /// Learn the total row count with a count-only query
    pub fn probe_total(&self, collection: Arc<str>) -> StoreFuture<usize> {
        self.fetch_window(collection, FetchRange::new(0, COUNT_PROBE_SIZE))
            .map(|page| page.map(|p| p.total_count))
            .boxed()
    }

    /// List the collections the store serves
    pub fn list_collections(&self) -> StoreFuture<Vec<CollectionInfo>> {
        self.store.list_collections()
    }
}

impl std::fmt::Debug for RangeStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeStoreClient")
            .field("store", &self.store.name())
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}
