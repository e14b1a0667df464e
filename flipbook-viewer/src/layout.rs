//! Responsive page sizing.
//!
//! The book must fit the window on both axes at a fixed aspect ratio. Width is
//! chosen first from the viewport class; when the resulting height would not
//! fit the vertical budget, height is pinned and width is solved back from it.

use crate::config::LayoutConfig;

/// Coarse device-size bucket driving the layout rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportClass {
    Mobile,
    Tablet,
    Desktop,
}

impl ViewportClass {
    /// Only desktop has room for a two-page spread; tablet pages are sized
    /// at up to 80% of the available width.
    pub fn is_portrait(self) -> bool {
        !matches!(self, Self::Desktop)
    }
}

/// Page size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageDimensions {
    pub width: u32,
    pub height: u32,
}

impl PageDimensions {
    pub fn scaled(self, factor: f32) -> (f32, f32) {
        (self.width as f32 * factor, self.height as f32 * factor)
    }
}

/// Pure sizing rules. Recomputing with the same inputs always yields the
/// same output, so callers may invoke it on every resize event.
#[derive(Debug, Clone, Default)]
pub struct ResponsiveSizer {
    config: LayoutConfig,
}

impl ResponsiveSizer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, viewport_width: f64) -> ViewportClass {
        if viewport_width <= self.config.mobile_max_width {
            ViewportClass::Mobile
        } else if viewport_width <= self.config.tablet_max_width {
            ViewportClass::Tablet
        } else {
            ViewportClass::Desktop
        }
    }

    /// Space left for the book once header, footer and padding are reserved.
    pub fn available(
        &self,
        viewport_width: f64,
        viewport_height: f64,
        class: ViewportClass,
    ) -> (f64, f64) {
        let margins = match class {
            ViewportClass::Mobile => self.config.mobile_margins,
            ViewportClass::Tablet | ViewportClass::Desktop => self.config.wide_margins,
        };

        (
            (viewport_width - margins.horizontal).max(0.0),
            (viewport_height - margins.vertical).max(0.0),
        )
    }

    pub fn compute_dimensions(
        &self,
        viewport_width: f64,
        viewport_height: f64,
        class: ViewportClass,
    ) -> PageDimensions {
        let c = &self.config;
        let (available_width, available_height) =
            self.available(viewport_width, viewport_height, class);

        // (preferred width, height limit, height used once the limit is hit)
        let (preferred, limit, fallback) = match class {
            ViewportClass::Mobile => (available_width, available_height, available_height),
            ViewportClass::Tablet => (
                (available_width * c.tablet_width_fraction).min(c.tablet_max_page_width),
                available_height,
                available_height * c.tablet_height_fraction,
            ),
            ViewportClass::Desktop => {
                let budget = available_height * c.desktop_height_fraction;
                (
                    (available_width / 2.0 * c.desktop_width_fraction)
                        .min(c.desktop_max_page_width),
                    budget,
                    budget,
                )
            }
        };

        let width = if preferred * c.aspect_ratio > limit {
            fallback / c.aspect_ratio
        } else {
            preferred
        };

        // Whole pixels only: fractional sizes leave seams between pages.
        let width = whole_pixels(width).min(available_width.floor());
        let height = whole_pixels(width * c.aspect_ratio).min(available_height.floor());

        PageDimensions {
            width: width as u32,
            height: height as u32,
        }
    }
}

/// Floors to an integer while absorbing representation error from
/// fractional constants (460 * 0.9 must stay 414).
fn whole_pixels(value: f64) -> f64 {
    (value + 1e-9).floor().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sizer() -> ResponsiveSizer {
        ResponsiveSizer::default()
    }

    #[test]
    fn classifies_breakpoints() {
        let s = sizer();
        assert_eq!(s.classify(375.0), ViewportClass::Mobile);
        assert_eq!(s.classify(768.0), ViewportClass::Mobile);
        assert_eq!(s.classify(769.0), ViewportClass::Tablet);
        assert_eq!(s.classify(1024.0), ViewportClass::Tablet);
        assert_eq!(s.classify(1025.0), ViewportClass::Desktop);
    }

    #[test]
    fn mobile_fills_available_width() {
        let s = sizer();
        assert_eq!(s.available(400.0, 800.0, ViewportClass::Mobile), (360.0, 600.0));
        assert_eq!(
            s.compute_dimensions(400.0, 800.0, ViewportClass::Mobile),
            PageDimensions {
                width: 360,
                height: 509
            }
        );
    }

    #[test]
    fn mobile_short_viewport_is_height_bound() {
        let dims = sizer().compute_dimensions(600.0, 500.0, ViewportClass::Mobile);
        // available 560 x 300: height pinned to 300, width solved back
        assert_eq!(
            dims,
            PageDimensions {
                width: 212,
                height: 299
            }
        );
    }

    #[test]
    fn desktop_sizes_for_two_page_spread() {
        let dims = sizer().compute_dimensions(1000.0, 1000.0, ViewportClass::Desktop);
        assert_eq!(
            dims,
            PageDimensions {
                width: 414,
                height: 585
            }
        );
    }

    #[test]
    fn desktop_width_is_capped() {
        let dims = sizer().compute_dimensions(2560.0, 1440.0, ViewportClass::Desktop);
        assert_eq!(dims.width, 600);
        assert_eq!(dims.height, 848);
    }

    #[test]
    fn tablet_overflow_uses_reduced_height_budget() {
        let dims = sizer().compute_dimensions(900.0, 1000.0, ViewportClass::Tablet);
        // available 820 x 750; 656 px wide would be 927 tall, so height
        // falls back to 85% of 750 and width follows.
        assert_eq!(
            dims,
            PageDimensions {
                width: 450,
                height: 636
            }
        );
    }

    #[test]
    fn viewport_smaller_than_chrome_yields_empty_page() {
        let dims = sizer().compute_dimensions(30.0, 100.0, ViewportClass::Mobile);
        assert_eq!(dims, PageDimensions::default());
    }

    fn any_class() -> impl Strategy<Value = ViewportClass> {
        prop_oneof![
            Just(ViewportClass::Mobile),
            Just(ViewportClass::Tablet),
            Just(ViewportClass::Desktop),
        ]
    }

    proptest! {
        #[test]
        fn fits_both_axes(
            width in 0.0f64..4000.0,
            height in 0.0f64..3000.0,
            class in any_class(),
        ) {
            let s = sizer();
            let (available_width, available_height) = s.available(width, height, class);
            let dims = s.compute_dimensions(width, height, class);

            prop_assert!(f64::from(dims.width) <= available_width);
            prop_assert!(f64::from(dims.height) <= available_height);
        }

        #[test]
        fn spread_fits_available_width(
            width in 0.0f64..4000.0,
            height in 0.0f64..3000.0,
        ) {
            let s = sizer();
            let class = s.classify(width);
            let (available_width, _) = s.available(width, height, class);
            let dims = s.compute_dimensions(width, height, class);
            let pages = if class.is_portrait() { 1 } else { 2 };

            prop_assert!(f64::from(dims.width * pages) <= available_width);
        }

        #[test]
        fn keeps_aspect_ratio(
            width in 200.0f64..4000.0,
            height in 400.0f64..3000.0,
            class in any_class(),
        ) {
            let dims = sizer().compute_dimensions(width, height, class);
            let expected = f64::from(dims.width) * crate::config::A4_ASPECT_RATIO;
            prop_assert!((f64::from(dims.height) - expected).abs() <= 1.0);
        }

        #[test]
        fn is_idempotent(
            width in 0.0f64..4000.0,
            height in 0.0f64..3000.0,
            class in any_class(),
        ) {
            let s = sizer();
            prop_assert_eq!(
                s.compute_dimensions(width, height, class),
                s.compute_dimensions(width, height, class)
            );
        }
    }
}
