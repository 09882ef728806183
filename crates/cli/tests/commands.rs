//! Integration tests for the subcommands, driven through argument parsing.

use clap::Parser;
use formfill_cli::cli::{Cli, Command, LogFormatArg};
use formfill_cli::commands::{run, run_add, run_fill, run_move, run_remove, run_resize};
use lopdf::{dictionary, Object};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn create_pdf(path: &Path) {
    let mut doc = lopdf::Document::new();
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => Object::Array(vec![page_id.into()]),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["formfill"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

fn workspace() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("form.pdf");
    create_pdf(&pdf);
    (dir, pdf)
}

#[test]
fn test_edit_commands_update_sidecar_files() {
    let (_dir, pdf) = workspace();
    let pdf_arg = pdf.to_str().unwrap();

    let Command::Add(add) = parse(&["add", pdf_arg, "--name", "name", "--x", "100", "--y", "60"])
    else {
        panic!("expected add");
    };
    let saved = run_add(&add).unwrap();

    let Command::Add(add) = parse(&["add", pdf_arg, "--name", "city", "--x", "100", "--y", "120"])
    else {
        panic!("expected add");
    };
    run_add(&add).unwrap();

    let Command::Move(mv) = parse(&["move", pdf_arg, "--name", "city", "--x", "-5", "--y", "300"])
    else {
        panic!("expected move");
    };
    run_move(&mv).unwrap();

    let Command::Resize(resize) =
        parse(&["resize", pdf_arg, "--name", "name", "--width", "80", "--height", "50"])
    else {
        panic!("expected resize");
    };
    run_resize(&resize).unwrap();

    let layout = form::load_layout(&saved.fields).unwrap();
    assert_eq!(layout.names(), vec!["name", "city"]);

    let name = layout.get("name").unwrap();
    assert_eq!((name.width, name.height, name.font_size), (100.0, 50.0, 30.0));

    let city = layout.get("city").unwrap();
    assert_eq!((city.x, city.y), (0.0, 300.0));

    assert_eq!(
        std::fs::read_to_string(&saved.template).unwrap(),
        "name,city\n,\n"
    );

    let Command::Remove(remove) = parse(&["remove", pdf_arg, "--name", "city"]) else {
        panic!("expected remove");
    };
    run_remove(&remove).unwrap();
    assert_eq!(form::load_layout(&saved.fields).unwrap().names(), vec!["name"]);
}

#[test]
fn test_add_duplicate_name_fails() {
    let (_dir, pdf) = workspace();
    let pdf_arg = pdf.to_str().unwrap();

    let Command::Add(add) = parse(&["add", pdf_arg, "--name", "name", "--x", "1", "--y", "1"])
    else {
        panic!("expected add");
    };
    run_add(&add).unwrap();
    let error = run_add(&add).unwrap_err();
    assert!(format!("{error:#}").contains("Duplicate field name"));
}

#[test]
fn test_fill_writes_one_pdf_per_row() {
    let (dir, pdf) = workspace();
    let pdf_arg = pdf.to_str().unwrap();

    let Command::Add(add) = parse(&["add", pdf_arg, "--name", "name", "--x", "100", "--y", "60"])
    else {
        panic!("expected add");
    };
    run_add(&add).unwrap();

    let csv = dir.path().join("rows.csv");
    std::fs::write(&csv, "name\nAda\nGrace\n").unwrap();
    let out = dir.path().join("out");

    let Command::Fill(fill) = parse(&[
        "fill",
        pdf_arg,
        "--csv",
        csv.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
    ]) else {
        panic!("expected fill");
    };
    let report = run_fill(&fill).unwrap();

    assert_eq!(report.rows, 2);
    assert!(out.join("output_1.pdf").exists());
    assert!(out.join("output_2.pdf").exists());
}

#[test]
fn test_fill_header_mismatch_reports_names() {
    let (dir, pdf) = workspace();
    let pdf_arg = pdf.to_str().unwrap();

    let Command::Add(add) = parse(&["add", pdf_arg, "--name", "name", "--x", "100", "--y", "60"])
    else {
        panic!("expected add");
    };
    run_add(&add).unwrap();

    let csv = dir.path().join("rows.csv");
    std::fs::write(&csv, "email\nada@example.com\n").unwrap();

    let command = parse(&["fill", pdf_arg, "--csv", csv.to_str().unwrap()]);
    let message = format!("{:#}", run(&command).unwrap_err());

    assert!(message.contains("Missing fields: [\"name\"]"));
    assert!(message.contains("Extra fields: [\"email\"]"));
}

#[test]
fn test_info_and_list_run() {
    let (_dir, pdf) = workspace();
    let pdf_arg = pdf.to_str().unwrap();

    run(&parse(&["info", pdf_arg])).unwrap();
    run(&parse(&["add", pdf_arg, "--name", "n", "--x", "4", "--y", "4"])).unwrap();
    run(&parse(&["list", pdf_arg])).unwrap();
}

#[test]
fn test_resize_requires_a_dimension() {
    let result = Cli::try_parse_from(["formfill", "resize", "form.pdf", "--name", "n"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["formfill", "info", "form.pdf", "-vv", "--log-format", "json"])
        .unwrap();
    assert_eq!(
        cli.verbosity.tracing_level_filter(),
        tracing::level_filters::LevelFilter::TRACE
    );
    assert!(matches!(cli.log_format, LogFormatArg::Json));
}
