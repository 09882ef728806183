//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use editor::{render_overlay, DragKind, Editor, Point, SavedFiles, Viewport};
use form::{fields_path_for, load_layout, BatchJob, BatchReport, FillConfig, Layout};
use pdf_core::PdfDocument;

use crate::cli::{
    AddArgs, Command, FillArgs, InfoArgs, ListArgs, MoveArgs, PreviewArgs, RemoveArgs, ResizeArgs,
};
use crate::summary::{print_fields, print_fill_summary, print_info, print_saved};

/// Run a parsed subcommand.
pub fn run(command: &Command) -> Result<()> {
    match command {
        Command::Info(args) => run_info(args),
        Command::Add(args) => {
            let saved = run_add(args)?;
            print_saved(&saved);
            Ok(())
        }
        Command::Move(args) => {
            let saved = run_move(args)?;
            print_saved(&saved);
            Ok(())
        }
        Command::Resize(args) => {
            let saved = run_resize(args)?;
            print_saved(&saved);
            Ok(())
        }
        Command::Remove(args) => {
            let saved = run_remove(args)?;
            print_saved(&saved);
            Ok(())
        }
        Command::List(args) => run_list(args),
        Command::Fill(args) => {
            let report = run_fill(args)?;
            print_fill_summary(&report);
            Ok(())
        }
        Command::Preview(args) => run_preview(args),
    }
}

pub fn run_info(args: &InfoArgs) -> Result<()> {
    let doc = PdfDocument::open(&args.pdf)
        .with_context(|| format!("failed to open {}", args.pdf.display()))?;
    let page = doc.page_size(1)?;
    let canvas = Viewport::default().canvas_size(page);
    print_info(&args.pdf, doc.page_count(), page, canvas);
    Ok(())
}

pub fn run_add(args: &AddArgs) -> Result<SavedFiles> {
    let mut editor = open_editor(&args.pdf)?;
    editor.toggle_add_mode();
    editor
        .click(Point::new(args.x, args.y), Some(&args.name))
        .with_context(|| format!("failed to add field {:?}", args.name))?
        .with_context(|| format!("field name {:?} is blank", args.name))?;
    save_editor(&editor, &args.pdf)
}

pub fn run_move(args: &MoveArgs) -> Result<SavedFiles> {
    let mut editor = open_editor(&args.pdf)?;
    let start = {
        let field = find_field(editor.layout(), &args.name)?;
        Point::new(field.x, field.y)
    };
    editor.begin_drag(&args.name, DragKind::Move, start)?;
    editor.drag_to(Point::new(args.x, args.y))?;
    editor.end_drag();
    save_editor(&editor, &args.pdf)
}

pub fn run_resize(args: &ResizeArgs) -> Result<SavedFiles> {
    let mut editor = open_editor(&args.pdf)?;
    let (width, height) = {
        let field = find_field(editor.layout(), &args.name)?;
        (field.width, field.height)
    };

    if let Some(new_width) = args.width {
        editor.begin_drag(&args.name, DragKind::Width, Point::new(width, 0.0))?;
        editor.drag_to(Point::new(new_width, 0.0))?;
        editor.end_drag();
    }
    if let Some(new_height) = args.height {
        editor.begin_drag(&args.name, DragKind::Height, Point::new(0.0, height))?;
        editor.drag_to(Point::new(0.0, new_height))?;
        editor.end_drag();
    }
    save_editor(&editor, &args.pdf)
}

pub fn run_remove(args: &RemoveArgs) -> Result<SavedFiles> {
    let mut editor = open_editor(&args.pdf)?;
    editor.remove(&args.name)?;
    save_editor(&editor, &args.pdf)
}

pub fn run_list(args: &ListArgs) -> Result<()> {
    let path = match (&args.fields, &args.pdf) {
        (Some(fields), _) => fields.clone(),
        (None, Some(pdf)) => fields_path_for(pdf),
        (None, None) => anyhow::bail!("either a PDF or --fields is required"),
    };
    let layout =
        load_layout(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let viewport = Viewport::new(args.scale)?;
    print_fields(&layout, &viewport);
    Ok(())
}

pub fn run_fill(args: &FillArgs) -> Result<BatchReport> {
    let mut config = match &args.config {
        Some(path) => FillConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FillConfig::default(),
    };
    if let Some(font) = &args.font {
        config.font = Some(font.clone());
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }

    let fields = args
        .fields
        .clone()
        .unwrap_or_else(|| fields_path_for(&args.pdf));
    let layout =
        load_layout(&fields).with_context(|| format!("failed to load {}", fields.display()))?;

    BatchJob::new(&args.pdf, &layout, &config)
        .run(&args.csv, args.output_dir.clone())
        .with_context(|| format!("failed to fill {}", args.pdf.display()))
}

pub fn run_preview(args: &PreviewArgs) -> Result<()> {
    let layout = load_layout(&args.fields)
        .with_context(|| format!("failed to load {}", args.fields.display()))?;
    let image = std::fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;
    let png = render_overlay(&image, &layout)?;
    std::fs::write(&args.output, png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Preview: {}", args.output.display());
    Ok(())
}

fn open_editor(pdf: &Path) -> Result<Editor> {
    Editor::for_pdf(pdf)
        .with_context(|| format!("failed to load the layout saved for {}", pdf.display()))
}

fn save_editor(editor: &Editor, pdf: &Path) -> Result<SavedFiles> {
    editor
        .save(pdf)
        .with_context(|| format!("failed to save the layout for {}", pdf.display()))
}

fn find_field<'a>(layout: &'a Layout, name: &str) -> Result<&'a form::Field> {
    layout
        .get(name)
        .with_context(|| format!("no field named {name:?}"))
}
