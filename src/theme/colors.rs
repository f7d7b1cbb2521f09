//! Colors - Rowscope Theme Colors

use gpui::{Rgba, rgb};

/// Rowscope color palette - All colors are accessed via associated functions
pub struct ScopeColors;

impl ScopeColors {
    // Background colors
    /// Main background
    pub fn background() -> Rgba { rgb(0xf5f5f5) }
    /// Table body background
    pub fn content_bg() -> Rgba { rgb(0xffffff) }
    /// Title bar background - Cyan/Teal
    pub fn title_bg() -> Rgba { rgb(0x2cb3b8) }
    /// Status bar background
    pub fn status_bg() -> Rgba { rgb(0xf9fafb) }

    // Text colors
    /// Primary text
    pub fn text_primary() -> Rgba { rgb(0x1f2937) }
    /// Secondary text
    pub fn text_secondary() -> Rgba { rgb(0x6b7280) }
    /// Muted text
    pub fn text_muted() -> Rgba { rgb(0x9ca3af) }
    /// Light text (on dark backgrounds)
    pub fn text_light() -> Rgba { rgb(0xffffff) }

    // Status colors
    /// Success - Green
    pub fn success() -> Rgba { rgb(0x22c55e) }
    /// Warning - Amber
    pub fn warning() -> Rgba { rgb(0xf59e0b) }
    /// Error/Danger - Red
    pub fn danger() -> Rgba { rgb(0xef4444) }

    // Border colors
    /// Default border
    pub fn border() -> Rgba { rgb(0xe5e7eb) }
    /// Column resize grip while hovered or dragged
    pub fn border_focus() -> Rgba { rgb(0x3b82f6) }

    // Table colors
    /// Table header background
    pub fn table_header_bg() -> Rgba { rgb(0xf9fafb) }
    /// Table row hover
    pub fn table_row_hover() -> Rgba { rgb(0xf3f4f6) }
    /// Table row alternate
    pub fn table_row_alt() -> Rgba { rgb(0xf9fafb) }
    /// Skeleton bar drawn in placeholder rows
    pub fn skeleton() -> Rgba { rgb(0xe5e7eb) }
}
