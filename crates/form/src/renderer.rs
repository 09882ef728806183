//! Row stamping

use crate::{FillConfig, Layout, Row};
use pdf_core::PdfDocument;

/// Fields are always stamped on the first page
const TARGET_PAGE: usize = 1;

/// What happened to each field of one row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowReport {
    /// Fields stamped with their own geometry
    pub stamped: Vec<String>,
    /// Fields with an empty value
    pub skipped: Vec<String>,
    /// Fields stamped with the fixed fallback size
    pub fallback: Vec<String>,
    /// Fields that could not be stamped at all
    pub failed: Vec<String>,
}

/// Stamps CSV rows onto a template using a field layout
pub struct FormRenderer<'a> {
    layout: &'a Layout,
    config: &'a FillConfig,
}

impl<'a> FormRenderer<'a> {
    /// Create a new renderer for a layout
    pub fn new(layout: &'a Layout, config: &'a FillConfig) -> Self {
        Self { layout, config }
    }

    /// Stamp one row onto the document
    ///
    /// Each non-empty value is drawn with its baseline at the vertical middle
    /// of the field, sized by the field height. If that insertion fails the
    /// value is retried at the field's top-left corner with the fallback
    /// size; a second failure is logged and the field left blank.
    pub fn render_row(&self, doc: &mut PdfDocument, row: &Row) -> RowReport {
        let mut report = RowReport::default();
        let to_points = 1.0 / self.config.scale;

        for field in self.layout.fields() {
            let value = row.get(&field.name).map(String::as_str).unwrap_or_default();
            if value.is_empty() {
                report.skipped.push(field.name.clone());
                continue;
            }

            let rect = field.rect().scaled(to_points);
            let font_size = (rect.height * self.config.font_ratio) as f32;

            match doc.insert_text(value, TARGET_PAGE, rect.x, rect.y + rect.height / 2.0, font_size)
            {
                Ok(()) => {
                    tracing::debug!(field = %field.name, x = rect.x, y = rect.y, font_size, "stamped field");
                    report.stamped.push(field.name.clone());
                }
                Err(err) => {
                    tracing::warn!(field = %field.name, error = %err, "error inserting text, retrying with fixed font size");
                    match doc.insert_text(
                        value,
                        TARGET_PAGE,
                        rect.x,
                        rect.y,
                        self.config.fallback_font_size,
                    ) {
                        Ok(()) => report.fallback.push(field.name.clone()),
                        Err(err) => {
                            tracing::warn!(field = %field.name, error = %err, "fallback insertion also failed");
                            report.failed.push(field.name.clone());
                        }
                    }
                }
            }
        }

        report
    }
}
