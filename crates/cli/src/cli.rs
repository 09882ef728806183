//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser)]
#[command(
    name = "formfill",
    version,
    about = "Place named fields over a PDF page and fill it from CSV rows",
    long_about = "Place named fields over the first page of a PDF, then fill the PDF\n\
                  once per CSV row.\n\n\
                  Field positions are canvas pixels of the page rendered at 2x zoom.\n\
                  Editing commands keep <PDF>_fields.json and <PDF>_template.csv\n\
                  next to the PDF up to date."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show page count and first page size.
    Info(InfoArgs),

    /// Place a new field at a canvas point.
    Add(AddArgs),

    /// Move a field's top-left corner to a canvas point.
    Move(MoveArgs),

    /// Change a field's width or height.
    Resize(ResizeArgs),

    /// Delete a field.
    Remove(RemoveArgs),

    /// List the fields of a layout.
    List(ListArgs),

    /// Fill the PDF once per CSV row.
    Fill(FillArgs),

    /// Draw the field outlines over a rendered page image.
    Preview(PreviewArgs),
}

#[derive(Args)]
pub struct InfoArgs {
    /// Template PDF.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,
}

#[derive(Args)]
pub struct AddArgs {
    /// Template PDF.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    /// Field name, matched against a CSV column.
    #[arg(long)]
    pub name: String,

    /// Left edge in canvas pixels.
    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    /// Top edge in canvas pixels.
    #[arg(long, allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Template PDF.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    #[arg(long)]
    pub name: String,

    /// New left edge in canvas pixels (clamped to 0).
    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    /// New top edge in canvas pixels (clamped to 0).
    #[arg(long, allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Args)]
pub struct ResizeArgs {
    /// Template PDF.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    #[arg(long)]
    pub name: String,

    /// New width in canvas pixels (at least 100).
    #[arg(long, required_unless_present = "height")]
    pub width: Option<f64>,

    /// New height in canvas pixels (at least 25); also sets the font size.
    #[arg(long)]
    pub height: Option<f64>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Template PDF.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    #[arg(long)]
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Template PDF whose saved layout is listed.
    #[arg(value_name = "PDF", required_unless_present = "fields")]
    pub pdf: Option<PathBuf>,

    /// Layout file to list instead.
    #[arg(long, value_name = "JSON", conflicts_with = "pdf")]
    pub fields: Option<PathBuf>,

    /// Scale used to show PDF point coordinates.
    #[arg(long, default_value_t = editor::DEFAULT_SCALE)]
    pub scale: f64,
}

#[derive(Args)]
pub struct FillArgs {
    /// Template PDF.
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    /// Layout file (default: <PDF>_fields.json).
    #[arg(long, value_name = "JSON")]
    pub fields: Option<PathBuf>,

    /// CSV data; the header must name exactly the layout's fields.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Output directory (default: <CSV>_output_<timestamp> next to the CSV).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Fill configuration file (JSON); flags below override it.
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// TrueType font to embed instead of Helvetica.
    #[arg(long, value_name = "TTF")]
    pub font: Option<PathBuf>,

    /// Canvas pixels per PDF point.
    #[arg(long)]
    pub scale: Option<f64>,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Page image rendered at the canvas scale (PNG or JPEG).
    #[arg(long, value_name = "IMAGE")]
    pub image: PathBuf,

    /// Layout file.
    #[arg(long, value_name = "JSON")]
    pub fields: PathBuf,

    /// Where to write the PNG.
    #[arg(long, value_name = "PNG")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
