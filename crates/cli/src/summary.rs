//! Console output for subcommand results.

use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use editor::{CanvasSize, SavedFiles, Viewport};
use form::{BatchReport, Layout};
use pdf_core::PageSize;

pub fn print_info(pdf: &Path, page_count: usize, page: PageSize, canvas: CanvasSize) {
    println!("PDF: {}", pdf.display());
    println!("Pages: {page_count}");
    println!("Page size: {} x {} pt", page.width, page.height);
    println!("Canvas size: {} x {} px", canvas.width, canvas.height);
}

pub fn print_saved(saved: &SavedFiles) {
    println!("Fields configuration saved");
    println!("JSON: {}", saved.fields.display());
    println!("CSV Template: {}", saved.template.display());
}

/// Layout table with canvas and PDF coordinates side by side.
pub fn print_fields(layout: &Layout, viewport: &Viewport) {
    if layout.is_empty() {
        println!("No fields");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("x"),
        header_cell("y"),
        header_cell("Width"),
        header_cell("Height"),
        header_cell("Font"),
        header_cell("PDF rect (pt)"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for field in layout.fields() {
        let pdf = viewport.rect_to_pdf(field.rect());
        table.add_row(vec![
            Cell::new(&field.name).add_attribute(Attribute::Bold),
            Cell::new(field.x),
            Cell::new(field.y),
            Cell::new(field.width),
            Cell::new(field.height),
            Cell::new(field.font_size),
            dim_cell(format!(
                "{} {} {} {}",
                pdf.x, pdf.y, pdf.width, pdf.height
            )),
        ]);
    }
    println!("{table}");
}

pub fn print_fill_summary(report: &BatchReport) {
    println!("Output: {}", report.output_dir.display());
    println!("Created {} PDF files", report.outputs.len());

    if report.problems.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Field")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (row, field) in &report.problems {
        table.add_row(vec![Cell::new(row), Cell::new(field).fg(Color::Yellow)]);
    }
    println!("Fields not stamped at their own size:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
