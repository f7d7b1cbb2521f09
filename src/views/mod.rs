//! View Components
//!
//! ## Layout Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 TitleBar (collections)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     Table header                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │                      Table body                             │
//! │                                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       StatusBar                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod table_view;

pub use table_view::*;
