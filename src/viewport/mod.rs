//! Viewport - Sliding Window Controller
//!
//! Scroll position in, positioned rows out:
//!
//! ```text
//! scroll/resize ─▶ ViewportTracker ─▶ WindowCalculator ─▶ DebouncedFetcher
//!                                                              │
//!        TableGeometry ◀── RowCache ◀── RangeStoreClient ◀─────┘
//! ```
//!
//! Everything except [`controller`] is synchronous and IO-free.

pub mod cache;
pub mod columns;
pub mod controller;
pub mod fetcher;
pub mod geometry;
pub mod tracker;
pub mod window;

pub use cache::RowCache;
pub use columns::{Column, ColumnLayout};
pub use controller::{ViewportCommand, ViewportController, ViewportHandle, ViewportSnapshot};
pub use fetcher::{DataOutcome, DataTicket, DebouncedFetcher, FetchOutcome, FetchPhase, ProbeTicket};
pub use geometry::{RowSlot, TableBody, TableGeometry};
pub use tracker::{TrackedRows, ViewportMetrics, ViewportTracker};
pub use window::{DesiredWindow, WindowCalculator};
