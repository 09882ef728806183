//! Integration tests for batch filling

use form::{parse_layout, BatchJob, FillConfig, FormError, Layout};
use lopdf::{dictionary, Object};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

/// Single A4 page with a drawn rectangle as existing content
fn create_template(path: &Path) {
    let mut doc = lopdf::Document::new();
    let pages_id = doc.new_object_id();
    let contents_id = doc.add_object(lopdf::Stream::new(
        dictionary! {},
        b"0.9 g 20 20 100 40 re f".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
        "Contents" => contents_id,
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

fn page_content(path: &Path) -> String {
    let doc = lopdf::Document::load(path).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

fn sample_layout() -> Layout {
    parse_layout(
        r#"[
            {"name": "name", "x": 100, "y": 200, "width": 150, "height": 40, "font_size": 24},
            {"name": "city", "x": 100, "y": 300, "width": 150, "height": 25, "font_size": 15}
        ]"#,
    )
    .unwrap()
}

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
    template: PathBuf,
}

fn fixture(csv: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let template = root.join("form.pdf");
    create_template(&template);
    std::fs::write(root.join("people.csv"), csv).unwrap();
    Fixture {
        _dir: dir,
        root,
        template,
    }
}

#[test]
fn test_one_output_per_row() {
    let fx = fixture("city,name\nParis,Ada\nRome,Grace\n,Linus\n");
    let layout = sample_layout();
    let config = FillConfig::default();
    let out = fx.root.join("out");

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(out.clone()))
        .unwrap();

    assert_eq!(report.rows, 3);
    assert_eq!(
        report.outputs,
        vec![
            out.join("output_1.pdf"),
            out.join("output_2.pdf"),
            out.join("output_3.pdf"),
        ]
    );
    for path in &report.outputs {
        assert!(path.exists());
    }
    assert_eq!(report.skipped, vec![(3, "city".to_string())]);
    assert!(report.problems.is_empty());
}

#[test]
fn test_stamped_values_in_output() {
    let fx = fixture("name,city\nAda,Paris\n");
    let layout = sample_layout();
    let config = FillConfig::default();
    let out = fx.root.join("out");

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(out))
        .unwrap();

    let content = page_content(&report.outputs[0]);
    // name: (50, 100 + 10) from top, size 20 * 0.6
    assert!(content.contains("50 732 Td"));
    assert!(content.contains("<416461> Tj"));
    // city: (50, 150 + 6.25) from top, size 12.5 * 0.6
    assert!(content.contains("50 685.75 Td"));
    assert!(content.contains(" 7.5 Tf"));
    assert!(content.contains("<5061726973> Tj"));
    // Template content is kept
    assert!(content.contains("20 20 100 40 re f"));
}

#[test]
fn test_template_is_not_modified() {
    let fx = fixture("name,city\nAda,Paris\n");
    let before = std::fs::read(&fx.template).unwrap();
    let layout = sample_layout();
    let config = FillConfig::default();

    BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(fx.root.join("out")))
        .unwrap();

    assert_eq!(std::fs::read(&fx.template).unwrap(), before);
}

#[test]
fn test_header_mismatch_creates_nothing() {
    let fx = fixture("name,zip\nAda,75001\n");
    let layout = sample_layout();
    let config = FillConfig::default();
    let out = fx.root.join("out");

    let result = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(out.clone()));

    match result {
        Err(FormError::HeaderMismatch { missing, extra }) => {
            assert_eq!(missing, vec!["city"]);
            assert_eq!(extra, vec!["zip"]);
        }
        other => panic!("Expected HeaderMismatch, got {other:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_default_output_dir_next_to_csv() {
    let fx = fixture("name,city\nAda,Paris\n");
    let layout = sample_layout();
    let config = FillConfig::default();

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), None)
        .unwrap();

    assert_eq!(report.output_dir.parent(), Some(fx.root.as_path()));
    let dir_name = report.output_dir.file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir_name.starts_with("people_output_"));
    // YYYYmmdd_HHMMSS
    assert_eq!(dir_name.len(), "people_output_".len() + 15);
    assert!(report.outputs[0].exists());
}

#[test]
fn test_unencodable_value_does_not_abort_row() {
    let fx = fixture("name,city\nสมชาย,Bangkok\n");
    let layout = sample_layout();
    let config = FillConfig::default();

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(fx.root.join("out")))
        .unwrap();

    assert_eq!(report.rows, 1);
    assert_eq!(report.problems, vec![(1, "name".to_string())]);
    let content = page_content(&report.outputs[0]);
    assert!(content.contains("<42616E676B6F6B> Tj"));
}

#[test]
fn test_configured_prefix_and_color() {
    let fx = fixture("name,city\nAda,Paris\n");
    let layout = sample_layout();
    let config = FillConfig {
        output_prefix: "letter".to_string(),
        text_color: Some([255, 0, 0]),
        ..FillConfig::default()
    };
    let out = fx.root.join("out");

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(out.clone()))
        .unwrap();

    assert_eq!(report.outputs, vec![out.join("letter_1.pdf")]);
    assert!(page_content(&report.outputs[0]).contains("1 0 0 rg"));
}

#[test]
fn test_header_only_csv_writes_no_files() {
    let fx = fixture("name,city\n");
    let layout = sample_layout();
    let config = FillConfig::default();
    let out = fx.root.join("out");

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(out.clone()))
        .unwrap();

    assert_eq!(report.rows, 0);
    assert!(out.is_dir());
}

fn test_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fonts/DejaVuSans.ttf")
}

#[test]
fn test_embedded_font_fill() {
    let fx = fixture("name,city\nAda,Ж\n");
    let layout = sample_layout();
    let config = FillConfig {
        font: Some(test_font_path()),
        ..FillConfig::default()
    };

    let report = BatchJob::new(&fx.template, &layout, &config)
        .run(fx.root.join("people.csv"), Some(fx.root.join("out")))
        .unwrap();

    assert!(report.problems.is_empty());
    let content = page_content(&report.outputs[0]);
    assert!(content.contains("<002400470044> Tj"));
    assert!(content.contains("<03AB> Tj"));

    let doc = lopdf::Document::load(&report.outputs[0]).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    assert_eq!(fonts.len(), 1);
    let font_id = fonts.get(b"FF1").unwrap().as_reference().unwrap();
    let font = doc.get_object(font_id).unwrap().as_dict().unwrap();
    assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
}

#[test]
fn test_unreadable_font_creates_nothing() {
    let fx = fixture("name,city\nAda,Paris\n");
    let layout = sample_layout();
    let out = fx.root.join("out");

    let missing = FillConfig {
        font: Some(fx.root.join("missing.ttf")),
        ..FillConfig::default()
    };
    let result = BatchJob::new(&fx.template, &layout, &missing)
        .run(fx.root.join("people.csv"), Some(out.clone()));
    assert!(matches!(result, Err(FormError::IoError(_))));
    assert!(!out.exists());

    let garbage = fx.root.join("garbage.ttf");
    std::fs::write(&garbage, b"not a font").unwrap();
    let invalid = FillConfig {
        font: Some(garbage),
        ..FillConfig::default()
    };
    let result = BatchJob::new(&fx.template, &layout, &invalid)
        .run(fx.root.join("people.csv"), Some(out.clone()));
    assert!(matches!(result, Err(FormError::PdfError(_))));
    assert!(!out.exists());
}

#[test]
fn test_missing_template_creates_nothing() {
    let fx = fixture("name,city\nAda,Paris\n");
    let layout = sample_layout();
    let config = FillConfig::default();
    let out = fx.root.join("out");

    let result = BatchJob::new(fx.root.join("absent.pdf"), &layout, &config)
        .run(fx.root.join("people.csv"), Some(out.clone()));

    assert!(matches!(result, Err(FormError::IoError(_))));
    assert!(!out.exists());
}
