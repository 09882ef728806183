//! Canvas and PDF coordinate mapping

use crate::{EditorError, Result};
use form::Rect;
use pdf_core::PageSize;

/// Zoom the page is rendered at: canvas pixels per PDF point
pub const DEFAULT_SCALE: f64 = 2.0;

/// A position in canvas pixels or PDF points, origin top-left
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the rendered page, which is also the canvas scroll region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Linear mapping between canvas pixels and PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl Viewport {
    /// Create a viewport; the scale must be a positive finite number
    pub fn new(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EditorError::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Canvas pixels to PDF points
    pub fn to_pdf(&self, value: f64) -> f64 {
        value / self.scale
    }

    /// PDF points to canvas pixels
    pub fn to_screen(&self, value: f64) -> f64 {
        value * self.scale
    }

    pub fn point_to_pdf(&self, point: Point) -> Point {
        Point::new(self.to_pdf(point.x), self.to_pdf(point.y))
    }

    pub fn point_to_screen(&self, point: Point) -> Point {
        Point::new(self.to_screen(point.x), self.to_screen(point.y))
    }

    pub fn rect_to_pdf(&self, rect: Rect) -> Rect {
        rect.scaled(1.0 / self.scale)
    }

    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        rect.scaled(self.scale)
    }

    /// Canvas size for a page rendered at this scale
    pub fn canvas_size(&self, page: PageSize) -> CanvasSize {
        CanvasSize {
            width: self.to_screen(page.width),
            height: self.to_screen(page.height),
        }
    }

    /// Canvas position of a pointer event in a scrolled view
    ///
    /// `event` is relative to the visible area, `scroll` is the canvas
    /// position of its top-left corner.
    pub fn canvas_point(&self, event: Point, scroll: Point) -> Point {
        Point::new(event.x + scroll.x, event.y + scroll.y)
    }
}
