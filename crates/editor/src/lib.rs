//! Editor - interactive field placement over a rendered page
//!
//! This crate provides:
//! - A viewport mapping canvas pixels to PDF points
//! - The placement controller: add mode, click-to-place, move and resize drags
//! - A preview image with the field outlines drawn over the page raster
//!
//! The controller is driven by pointer events and owns no widgets, so any
//! front end can sit on top of it.
//!
//! # Example
//!
//! ```ignore
//! use editor::{Editor, Point};
//!
//! let mut editor = Editor::new();
//! editor.toggle_add_mode();
//! editor.click(Point::new(240.0, 130.0), Some("name"))?;
//! let saved = editor.save("invoice.pdf")?;
//! ```

mod controller;
mod overlay;
mod viewport;

pub use controller::{
    DragKind, Editor, SavedFiles, DEFAULT_FONT_SIZE, DEFAULT_HEIGHT, DEFAULT_WIDTH, HEIGHT_HANDLE,
    MIN_HEIGHT, MIN_WIDTH, WIDTH_HANDLE,
};
pub use overlay::render_overlay;
pub use viewport::{CanvasSize, Point, Viewport, DEFAULT_SCALE};

use thiserror::Error;

/// Errors that can occur while editing a layout
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Layout error: {0}")]
    FormError(#[from] form::FormError),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid scale: {0}")]
    InvalidScale(f64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
