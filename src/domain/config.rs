//! Config - Viewer Configuration

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_BUFFER_SIZE, DEFAULT_COLUMN_WIDTH, DEFAULT_DEBOUNCE_MS,
    DEFAULT_OVERSCAN, DEFAULT_PAGE_SIZE, DEFAULT_ROW_HEIGHT, HEADER_HEIGHT, MAX_PAGE_SIZE,
    MIN_COLUMN_WIDTH,
};
use crate::error::Result;
use crate::helpers::get_or_create_config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Main viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Rows fetched beyond each side of the visible range
    pub buffer_size: usize,
    /// Rows rendered beyond each side of the viewport
    pub overscan: usize,
    /// Debounce quiet period in milliseconds
    pub debounce_ms: u64,
    /// Fixed row height in pixels
    pub row_height: f32,
    /// Hard cap on rows per request
    pub max_page_size: usize,
    /// Placeholder window size while no data is known
    pub default_page_size: usize,
    /// Table header height in pixels
    pub header_height: f32,
    /// Initial width of derived columns
    pub default_column_width: f32,
    /// Lower bound when resizing columns
    pub min_column_width: f32,
    /// Collection opened at startup
    pub collection: Option<String>,
    /// Backing store selection
    pub store: StoreConfig,
}

/// Backing store selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// JSON files in a directory, one collection per file
    FlatFile { data_dir: Option<PathBuf> },
    /// Remote range query service
    Http { base_url: String },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::FlatFile { data_dir: None }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            overscan: DEFAULT_OVERSCAN,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            row_height: DEFAULT_ROW_HEIGHT,
            max_page_size: MAX_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            header_height: HEADER_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            min_column_width: MIN_COLUMN_WIDTH,
            collection: None,
            store: StoreConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Debounce quiet period
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Clamp out-of-range values to something the viewer can work with
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            warn!(row_height = self.row_height, "Invalid row height, using default");
            self.row_height = defaults.row_height;
        }
        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_SIZE {
            warn!(max_page_size = self.max_page_size, "Page size cap out of range, clamping");
            self.max_page_size = self.max_page_size.clamp(1, MAX_PAGE_SIZE);
        }
        if self.default_page_size == 0 {
            self.default_page_size = defaults.default_page_size;
        }
        self.default_page_size = self.default_page_size.min(self.max_page_size);
        if !self.header_height.is_finite() || self.header_height < 0.0 {
            self.header_height = defaults.header_height;
        }
        if !self.min_column_width.is_finite() || self.min_column_width <= 0.0 {
            self.min_column_width = defaults.min_column_width;
        }
        if !self.default_column_width.is_finite() {
            self.default_column_width = defaults.default_column_width;
        }
        self.default_column_width = self.default_column_width.max(self.min_column_width);

        self
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Load from an explicit path, writing defaults if the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            std::fs::write(path, toml::to_string(&config)?)?;
            info!(path = %path.display(), "Wrote default viewer config");
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from the platform config directory
    pub fn load() -> Result<Self> {
        let path = get_or_create_config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ViewerConfig::from_toml("").expect("config");
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.buffer_size, 20);
        assert_eq!(config.overscan, 5);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.row_height, 50.0);
        assert_eq!(config.max_page_size, 1000);
    }

    #[test]
    fn test_partial_document_and_store() {
        let config = ViewerConfig::from_toml(
            r#"
            buffer_size = 10
            collection = "app-1"

            [store]
            kind = "http"
            base_url = "http://localhost:3000"
            "#,
        )
        .expect("config");

        assert_eq!(config.buffer_size, 10);
        assert_eq!(config.overscan, 5);
        assert_eq!(config.collection.as_deref(), Some("app-1"));
        assert_eq!(
            config.store,
            StoreConfig::Http {
                base_url: "http://localhost:3000".into()
            }
        );
    }

    #[test]
    fn test_normalization() {
        let config = ViewerConfig::from_toml(
            r#"
            row_height = 0.0
            max_page_size = 5000
            default_page_size = 0
            "#,
        )
        .expect("config");

        assert_eq!(config.row_height, 50.0);
        assert_eq!(config.max_page_size, 1000);
        assert_eq!(config.default_page_size, 50);
    }

    #[test]
    fn test_load_writes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = ViewerConfig::load_from(&path).expect("load");
        assert!(path.exists());
        assert_eq!(config, ViewerConfig::default());

        let reloaded = ViewerConfig::load_from(&path).expect("reload");
        assert_eq!(reloaded, config);
    }
}
