//! Viewer Constants
//!
//! Centralized defaults for windowing, fetching and layout.

/// Rows added on each side of the visible range when fetching
pub const DEFAULT_BUFFER_SIZE: usize = 20;

/// Rows rendered beyond the viewport (render-only)
pub const DEFAULT_OVERSCAN: usize = 5;

/// Quiet period before a desired range is fetched
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Fixed row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 50.0;

/// Hard cap on rows per range request
pub const MAX_PAGE_SIZE: usize = 1000;

/// Placeholder window size used before any data is known
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Size of the count-only metadata probe
pub const COUNT_PROBE_SIZE: usize = 1;

/// Table header height in pixels
pub const HEADER_HEIGHT: f32 = 40.0;

/// Status bar height
pub const STATUS_BAR_HEIGHT: f32 = 28.0;

/// Column widths
pub const DEFAULT_COLUMN_WIDTH: f32 = 160.0;
pub const MIN_COLUMN_WIDTH: f32 = 48.0;

/// Width of the column resize grip
pub const RESIZE_HANDLE_WIDTH: f32 = 6.0;

/// Default window dimensions
pub const DEFAULT_WINDOW_WIDTH: f32 = 1200.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 750.0;

/// Parsed flat files kept in memory
pub const FLAT_FILE_MEMO_CAPACITY: usize = 4;

/// Config and log file names
pub const CONFIG_FILE_NAME: &str = "rowscope.toml";
pub const LOG_FILE_PREFIX: &str = "rowscope.log";

/// Environment override for the flat-file data directory
pub const DATA_DIR_ENV: &str = "ROWSCOPE_DATA_DIR";
