use crate::config::{LayoutConfig, ZoomConfig};
use crate::layout::{PageDimensions, ResponsiveSizer, ViewportClass};

/// Viewport tracks the window size, the page size derived from it and the
/// zoom level applied on top.
#[derive(Debug, Clone)]
pub struct Viewport {
    sizer: ResponsiveSizer,
    zoom_config: ZoomConfig,
    width: f32,
    height: f32,
    class: ViewportClass,
    dimensions: PageDimensions,
    zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), ZoomConfig::default())
    }
}

impl Viewport {
    /// Window size assumed until the first resize report arrives.
    const INITIAL_SIZE: (f32, f32) = (1280.0, 800.0);

    pub fn new(layout: LayoutConfig, zoom_config: ZoomConfig) -> Self {
        let mut viewport = Self {
            sizer: ResponsiveSizer::new(layout),
            zoom: zoom_config.default,
            zoom_config,
            width: 0.0,
            height: 0.0,
            class: ViewportClass::Desktop,
            dimensions: PageDimensions::default(),
        };
        let (width, height) = Self::INITIAL_SIZE;
        viewport.resize(width, height);
        viewport
    }

    /// Recomputes class and page dimensions. Returns whether the class
    /// changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let class = self.sizer.classify(f64::from(width));
        let dimensions =
            self.sizer
                .compute_dimensions(f64::from(width), f64::from(height), class);

        let class_changed = class != self.class;
        self.width = width;
        self.height = height;
        self.class = class;
        self.dimensions = dimensions;

        tracing::debug!(width, height, ?class, ?dimensions, "viewport resized");
        class_changed
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn class(&self) -> ViewportClass {
        self.class
    }

    /// Page size after zoom, in logical pixels.
    pub fn page_size(&self) -> (f32, f32) {
        self.dimensions.scaled(self.zoom)
    }

    /// Pixel width pages are rasterised at.
    pub fn render_width(&self) -> u32 {
        self.page_size().0.floor() as u32
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_config.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_config.step);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = self.zoom_config.default;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        // Stay on the 0.1 grid so repeated steps do not drift.
        let snapped = (zoom * 10.0).round() / 10.0;
        self.zoom = snapped.clamp(self.zoom_config.min, self.zoom_config.max);
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.zoom_config.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.zoom_config.min
    }
}
