//! Theme - Colors and Typography

pub mod colors;
pub mod typography;

pub use colors::ScopeColors;
pub use typography::Typography;
