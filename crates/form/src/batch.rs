//! Batch filling: one output PDF per CSV row

use crate::csv_data::to_row;
use crate::{read_headers, validate_headers, FillConfig, FormRenderer, Layout, Result};
use chrono::NaiveDateTime;
use pdf_core::PdfDocument;
use std::path::{Path, PathBuf};

/// Font identifier used when a TrueType font is configured
const CUSTOM_FONT: &str = "custom";

/// Result of a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Directory the files were written to
    pub output_dir: PathBuf,
    /// Written files in row order
    pub outputs: Vec<PathBuf>,
    /// Number of data rows processed
    pub rows: usize,
    /// Fields left blank because the cell was empty, as `(row, field)` pairs
    pub skipped: Vec<(usize, String)>,
    /// Fields that fell back or failed, as `(row, field)` pairs
    pub problems: Vec<(usize, String)>,
}

/// Default output directory: `<csv path without extension>_output_<YYYYmmdd_HHMMSS>`
pub fn default_output_dir<P: AsRef<Path>>(csv_path: P, timestamp: NaiveDateTime) -> PathBuf {
    let csv_path = csv_path.as_ref();
    let stem = csv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}_output_{}", timestamp.format("%Y%m%d_%H%M%S"));
    csv_path.with_file_name(name)
}

/// Fills a template PDF once per CSV row
pub struct BatchJob<'a> {
    template: PathBuf,
    layout: &'a Layout,
    config: &'a FillConfig,
}

impl<'a> BatchJob<'a> {
    pub fn new<P: AsRef<Path>>(template: P, layout: &'a Layout, config: &'a FillConfig) -> Self {
        Self {
            template: template.as_ref().to_path_buf(),
            layout,
            config,
        }
    }

    /// Fill the template for every row of `csv_path`
    ///
    /// The CSV header is validated against the layout before anything is
    /// written. Without `output_dir` a timestamped directory is created next
    /// to the CSV file. A field that cannot be stamped never aborts its row.
    pub fn run<P: AsRef<Path>>(&self, csv_path: P, output_dir: Option<PathBuf>) -> Result<BatchReport> {
        let csv_path = csv_path.as_ref();
        self.config.validate()?;

        let headers = read_headers(csv_path)?;
        validate_headers(self.layout, &headers)?;

        let template = std::fs::read(&self.template)?;
        let font = match &self.config.font {
            Some(path) => Some(std::fs::read(path)?),
            None => None,
        };
        // An unreadable template or font fails here, before any output exists
        self.prepare(&template, font.as_deref())?;

        let output_dir = output_dir.unwrap_or_else(|| {
            default_output_dir(csv_path, chrono::Local::now().naive_local())
        });
        std::fs::create_dir_all(&output_dir)?;

        tracing::info!(
            template = %self.template.display(),
            csv = %csv_path.display(),
            output_dir = %output_dir.display(),
            fields = self.layout.len(),
            "starting batch fill"
        );

        let renderer = FormRenderer::new(self.layout, self.config);
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(csv_path)?;
        let header_record = reader.headers()?.clone();

        let mut outputs = Vec::new();
        let mut skipped = Vec::new();
        let mut problems = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let row_number = index + 1;
            let row = to_row(&header_record, &record?);

            let mut doc = self.prepare(&template, font.as_deref())?;
            let report = renderer.render_row(&mut doc, &row);
            skipped.extend(report.skipped.into_iter().map(|field| (row_number, field)));
            problems.extend(
                report
                    .fallback
                    .into_iter()
                    .chain(report.failed)
                    .map(|field| (row_number, field)),
            );

            let path = output_dir.join(self.config.output_file_name(row_number));
            doc.save(&path)?;
            tracing::info!(row = row_number, path = %path.display(), "created");
            outputs.push(path);
        }

        tracing::info!(rows = outputs.len(), "batch fill finished");
        Ok(BatchReport {
            output_dir,
            rows: outputs.len(),
            outputs,
            skipped,
            problems,
        })
    }

    /// Fresh copy of the template with the configured font and colour
    fn prepare(&self, template: &[u8], font: Option<&[u8]>) -> Result<PdfDocument> {
        let mut doc = PdfDocument::open_from_bytes(template)?;
        if let Some(font) = font {
            doc.add_font(CUSTOM_FONT, font)?;
            doc.set_font(CUSTOM_FONT)?;
        }
        doc.set_text_color(self.config.color());
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_output_dir() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();

        assert_eq!(
            default_output_dir("/data/people.csv", timestamp),
            PathBuf::from("/data/people_output_20240309_140507")
        );
        assert_eq!(
            default_output_dir("rows", timestamp),
            PathBuf::from("rows_output_20240309_140507")
        );
    }
}
