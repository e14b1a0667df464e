//! Named tunables for layout, gesture classification and zoom.
//!
//! Nothing here is read from disk; every value is fixed at compile time and
//! exposed through `Default` so tests can build variants.

use std::time::Duration;

/// Height-over-width ratio of a page (A4 ≈ 1:1.414).
pub const A4_ASPECT_RATIO: f64 = 1.414;

/// Maximum number of rasterised pages kept in memory.
pub const PAGE_CACHE_CAPACITY: usize = 16;

/// Horizontal and vertical space reserved for chrome around the book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Breakpoints and sizing rules used by [`crate::layout::ResponsiveSizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Widths up to and including this value are mobile.
    pub mobile_max_width: f64,
    /// Widths up to and including this value (and above mobile) are tablet.
    pub tablet_max_width: f64,
    pub aspect_ratio: f64,
    pub mobile_margins: Margins,
    /// Margins for tablet and desktop.
    pub wide_margins: Margins,
    /// Fraction of the available width a tablet page may take.
    pub tablet_width_fraction: f64,
    pub tablet_max_page_width: f64,
    /// Fraction of the available height used once a tablet page overflows.
    pub tablet_height_fraction: f64,
    /// Fraction of half the available width a desktop page may take.
    pub desktop_width_fraction: f64,
    pub desktop_max_page_width: f64,
    /// Vertical budget of a desktop page, as a fraction of available height.
    pub desktop_height_fraction: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: 768.0,
            tablet_max_width: 1024.0,
            aspect_ratio: A4_ASPECT_RATIO,
            mobile_margins: Margins {
                horizontal: 40.0,
                vertical: 200.0,
            },
            wide_margins: Margins {
                horizontal: 80.0,
                vertical: 250.0,
            },
            tablet_width_fraction: 0.8,
            tablet_max_page_width: 700.0,
            tablet_height_fraction: 0.85,
            desktop_width_fraction: 0.9,
            desktop_max_page_width: 600.0,
            desktop_height_fraction: 0.9,
        }
    }
}

/// Thresholds separating a tap from a drag or a long press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Displacement in logical pixels above which a press becomes a drag.
    pub drag_threshold: f32,
    /// Press duration above which a stationary press counts as held.
    pub hold_threshold: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            hold_threshold: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.2,
            default: 1.0,
        }
    }
}
