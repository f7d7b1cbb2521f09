//! State Management Layer
//!
//! Application state using GPUI's Entity system. Data flows one way:
//!
//! ```text
//! Scroll → TableState → ViewportHandle → controller task → snapshot → notify → UI Refresh
//! ```

mod table;

pub use table::*;
