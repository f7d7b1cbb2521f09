//! Service Hub
//!
//! Builds the configured backing store and hands out range clients to the
//! state layer.

use crate::domain::{CollectionInfo, StoreConfig, ViewerConfig};
use crate::error::Result;
use crate::helpers::resolve_dataset_dir;
use crate::services::{FlatFileStore, HttpRangeStore, RangeStore, RangeStoreClient};
use std::sync::Arc;

/// Central hub for backend services
#[derive(Clone)]
pub struct ServiceHub {
    /// Client for the configured store
    client: RangeStoreClient,
    /// Viewer configuration the hub was built from
    config: Arc<ViewerConfig>,
}

impl ServiceHub {
    /// Create a new service hub with the given configuration
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let store: Arc<dyn RangeStore> = match &config.store {
            StoreConfig::FlatFile { data_dir } => {
                let dir = resolve_dataset_dir(data_dir.as_deref())?;
                tracing::info!("Serving datasets from {}", dir.display());
                Arc::new(FlatFileStore::new(dir, config.max_page_size))
            }
            StoreConfig::Http { base_url } => {
                tracing::info!("Serving datasets from {}", base_url);
                Arc::new(HttpRangeStore::new(base_url)?)
            }
        };

        Ok(Self::with_store(store, config))
    }

    /// Create a hub around an existing store
    pub fn with_store(store: Arc<dyn RangeStore>, config: ViewerConfig) -> Self {
        Self {
            client: RangeStoreClient::new(store, config.max_page_size),
            config: Arc::new(config),
        }
    }

    /// Range client for a viewport controller
    pub fn client(&self) -> RangeStoreClient {
        self.client.clone()
    }

    /// Viewer configuration
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// List collections available in the store
    pub async fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        self.client.list_collections().await
    }
}

impl gpui::Global for ServiceHub {}

impl std::fmt::Debug for ServiceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("client", &self.client)
            .finish()
    }
}
