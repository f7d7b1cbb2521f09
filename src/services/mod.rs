//! Service Layer
//!
//! The service layer provides abstraction over backing stores and handles
//! async range queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ServiceHub                             │
//! │  ┌──────────────────┐   ┌───────────────┐  ┌────────────┐   │
//! │  │ RangeStoreClient │──▶│ FlatFileStore │  │ HttpRange- │   │
//! │  │ (caps, checks)   │   │ (JSON files)  │  │ Store      │   │
//! │  └──────────────────┘   └───────────────┘  └────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ RangePage
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Viewport Controller                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod flat_file;
mod http_store;
mod hub;
mod runtime;
mod store;

pub use client::*;
pub use flat_file::*;
pub use http_store::*;
pub use hub::*;
pub use runtime::*;
pub use store::*;
