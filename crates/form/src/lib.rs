//! Form layouts - field placement persistence and CSV batch filling
//!
//! This crate provides:
//! - Field and layout types with validation
//! - Layout JSON parsing/writing and the CSV template
//! - CSV header validation against a layout
//! - Row stamping onto a template PDF, with a fixed-size fallback
//! - Batch filling: one output PDF per CSV row
//!
//! # Example
//!
//! ```ignore
//! use form::{load_layout, BatchJob, FillConfig};
//!
//! let layout = load_layout("invoice.pdf_fields.json")?;
//! let config = FillConfig::default();
//! let report = BatchJob::new("invoice.pdf", &layout, &config).run("rows.csv", None)?;
//! println!("{} files in {}", report.outputs.len(), report.output_dir.display());
//! ```

mod batch;
mod config;
mod csv_data;
pub mod parser;
mod renderer;
mod schema;

pub use batch::{default_output_dir, BatchJob, BatchReport};
pub use config::FillConfig;
pub use csv_data::{read_headers, validate_headers, Row};
pub use parser::{
    fields_path_for, layout_to_json, load_layout, parse_layout, save_layout, template_path_for,
    write_csv_template,
};
pub use renderer::{FormRenderer, RowReport};
pub use schema::{derived_font_size, Field, Layout, Rect};

use thiserror::Error;

/// Errors that can occur during layout and fill processing
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Failed to parse layout: {0}")]
    ParseError(String),

    #[error("Invalid field '{name}': {reason}")]
    InvalidField { name: String, reason: String },

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error(
        "CSV fields don't match form fields.\nMissing fields: {missing:?}\nExtra fields: {extra:?}"
    )]
    HeaderMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Duplicate CSV column: {0}")]
    DuplicateColumn(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
