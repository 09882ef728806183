//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Reading page dimensions
//! - Stamping text at top-left based coordinates, using either the
//!   built-in Helvetica font or an embedded TrueType font
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::PdfDocument;
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! doc.insert_text("Hello, World!", 1, 100.0, 120.0, 12.0)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod font;
mod text;

pub use document::{Color, PageSize, PdfDocument};
pub use font::{helvetica_width, FontData, HELVETICA};
pub use text::{encode_win_ansi, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid font size: {0}")]
    InvalidFontSize(f32),

    #[error("Character {ch:?} cannot be encoded with font {font}")]
    UnsupportedCharacter { ch: char, font: String },

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
