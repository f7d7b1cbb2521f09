//! HTTP Range Store
//!
//! Client for a remote range query service:
//!
//! ```text
//! GET {base}/api/apps                          -> [{ "id", "totalCount" }]
//! GET {base}/api/apps/{id}/data?start=&size=   -> { "data": [...], "totalCount" }
//! ```

use crate::domain::{CollectionInfo, RangePage, RangeQuery};
use crate::error::{Error, Result};
use crate::services::store::{RangeStore, StoreFuture};
use futures::FutureExt;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Range store reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpRangeStore {
    client: Client,
    base_url: Url,
}

/// What to do with a response status
#[derive(Debug, PartialEq, Eq)]
enum StatusClass {
    Ok,
    Missing,
    Invalid,
    Failed,
}

fn classify(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Ok
    } else if status == StatusCode::NOT_FOUND {
        StatusClass::Missing
    } else if status == StatusCode::BAD_REQUEST {
        StatusClass::Invalid
    } else {
        StatusClass::Failed
    }
}

impl HttpRangeStore {
    /// Create a store for the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| Error::Invalid {
            message: format!("Invalid store URL {base_url}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Invalid {
                message: format!("Store URL {base_url} cannot be a base"),
            });
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Invalid {
                message: format!("Store URL {} cannot be a base", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL for a range query
    fn data_url(&self, query: &RangeQuery) -> Result<Url> {
        let mut url = self.endpoint(&["api", "apps", &query.collection, "data"])?;
        url.query_pairs_mut()
            .append_pair("start", &query.start.to_string())
            .append_pair("size", &query.size.to_string());
        Ok(url)
    }

    /// URL for the collection listing
    fn apps_url(&self) -> Result<Url> {
        self.endpoint(&["api", "apps"])
    }

    /// GET and decode a JSON body; `None` on 404
    async fn get_json<T: DeserializeOwned>(client: Client, url: Url) -> Result<Option<T>> {
        debug!(%url, "GET");
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(format!("{url}: {e}")))?;

        let status = response.status();
        match classify(status) {
            StatusClass::Ok => {}
            StatusClass::Missing => return Ok(None),
            StatusClass::Invalid => {
                let message = response.text().await.unwrap_or_default();
                return Err(Error::validation(if message.is_empty() {
                    status.to_string()
                } else {
                    message
                }));
            }
            StatusClass::Failed => {
                return Err(Error::transport(format!("{url}: HTTP {status}")));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("{url}: {e}")))?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| Error::unexpected(format!("{url}: malformed body: {e}")))
    }
}

impl RangeStore for HttpRangeStore {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_range(&self, query: RangeQuery) -> StoreFuture<RangePage> {
        let client = self.client.clone();
        let url = self.data_url(&query);
        let collection = query.collection.to_string();
        async move {
            Self::get_json::<RangePage>(client, url?)
                .await?
                .ok_or(Error::NotFound { collection })
        }
        .boxed()
    }

    fn list_collections(&self) -> StoreFuture<Vec<CollectionInfo>> {
        let client = self.client.clone();
        let url = self.apps_url();
        async move {
            let collections = Self::get_json::<Vec<CollectionInfo>>(client, url?).await?;
            Ok(collections.unwrap_or_default())
        }
        .boxed()
    }
}
