//! Layout JSON parsing and writing
//!
//! A layout file is a JSON array of `{name, x, y, width, height, font_size}`
//! objects, written with four-space indentation next to the template PDF.

use crate::{Field, FormError, Layout, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Parse a layout from a JSON string
pub fn parse_layout(json: &str) -> Result<Layout> {
    let fields: Vec<Field> =
        serde_json::from_str(json).map_err(|e| FormError::ParseError(e.to_string()))?;
    Layout::from_fields(fields)
}

/// Serialize a layout as JSON with four-space indentation
pub fn layout_to_json(layout: &Layout) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    layout.fields().serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| FormError::ParseError(e.to_string()))
}

/// Read a layout file
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<Layout> {
    let json = std::fs::read_to_string(path.as_ref())?;
    let layout = parse_layout(&json)?;
    tracing::debug!(path = %path.as_ref().display(), fields = layout.len(), "loaded layout");
    Ok(layout)
}

/// Write a layout file
pub fn save_layout<P: AsRef<Path>>(path: P, layout: &Layout) -> Result<()> {
    std::fs::write(path.as_ref(), layout_to_json(layout)?)?;
    tracing::debug!(path = %path.as_ref().display(), fields = layout.len(), "saved layout");
    Ok(())
}

/// Write the CSV template: a header row of field names and one empty row
pub fn write_csv_template<P: AsRef<Path>>(path: P, layout: &Layout) -> Result<()> {
    if layout.is_empty() {
        std::fs::write(path.as_ref(), "")?;
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(layout.names())?;
    writer.write_record(vec![""; layout.len()])?;
    writer.flush()?;
    Ok(())
}

/// Layout file saved alongside a PDF: `<pdf path>_fields.json`
pub fn fields_path_for<P: AsRef<Path>>(pdf_path: P) -> PathBuf {
    with_suffix(pdf_path.as_ref(), "_fields.json")
}

/// CSV template saved alongside a PDF: `<pdf path>_template.csv`
pub fn template_path_for<P: AsRef<Path>>(pdf_path: P) -> PathBuf {
    with_suffix(pdf_path.as_ref(), "_template.csv")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
