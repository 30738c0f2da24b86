//! Integration tests for the pdfsplit binary

use assert_cmd::Command;
use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// One-line-per-page PDF with a Courier font resource
fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Courier".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(count)),
            ("Kids", Object::Array(kids)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.save(path).unwrap();
}

const AGREEMENT: &[&str] = &[
    "TABLE DES MATIERES",
    "SOMMAIRE",
    "CHAPITRE 1 - OBJET",
    "Article 2",
    "Article 3",
    "ANNEXE A - SALAIRES",
    "Echelle 2024",
];

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--min-pages"))
        .stdout(predicate::str::contains("--merge-gap"))
        .stdout(predicate::str::contains("--batch"));
}

#[test]
fn test_zero_min_pages_is_rejected() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("cc.pdf");
    write_pdf(&pdf, AGREEMENT);

    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg(&pdf)
        .arg("--min-pages")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_pages"));
    assert!(!dir.path().join("cc_split").exists());
}

#[test]
fn test_single_document_is_split() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("cc.pdf");
    write_pdf(&pdf, AGREEMENT);

    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 3 file(s)"));

    assert_eq!(
        file_names(&dir.path().join("cc_split")),
        vec![
            "Annexe_p6-7.pdf",
            "Articles_p3-5.pdf",
            "TOC_p1-2.pdf",
            "analysis_report.txt",
        ]
    );
}

#[test]
fn test_dry_run_prints_report_only() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("cc.pdf");
    write_pdf(&pdf, AGREEMENT);

    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg(&pdf)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Document Analysis: cc.pdf"))
        .stdout(predicate::str::contains("Sections found: 3"));
    assert!(!dir.path().join("cc_split").exists());
}

#[test]
fn test_missing_input_fails() {
    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg("/nonexistent/agreement.pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed"));
}

#[test]
fn test_batch_reports_each_document() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    fs::create_dir(&inputs).unwrap();
    write_pdf(&inputs.join("good.pdf"), AGREEMENT);
    fs::write(inputs.join("broken.pdf"), b"not a pdf").unwrap();
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    let assert = cmd
        .arg("-b")
        .arg(&inputs)
        .arg("-o")
        .arg(&out)
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["processed"], 2);
    assert_eq!(summary["succeeded"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["files_created"], 3);
    assert!(out.join("good_split").join("TOC_p1-2.pdf").exists());
    assert!(!out.join("broken_split").exists());
}

#[test]
fn test_custom_pattern_file() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("cc.pdf");
    write_pdf(&pdf, &["PREAMBULE", "suite", "SIGNATURES", "Pour le syndicat"]);
    let patterns = dir.path().join("patterns.toml");
    fs::write(
        &patterns,
        r#"
[[sections]]
label = "Preambule"
rules = [{ pattern = '^PR[EÉ]AMBULE', confidence = 90 }]
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg(&pdf)
        .arg("--patterns")
        .arg(&patterns)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Preambule"))
        .stdout(predicate::str::contains("Pages: 1-4 (4 pages)"));
}

#[test]
fn test_invalid_pattern_file_fails() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("cc.pdf");
    write_pdf(&pdf, AGREEMENT);
    let patterns = dir.path().join("patterns.toml");
    fs::write(
        &patterns,
        "[[sections]]\nlabel = \"TOC\"\nrules = [{ pattern = '^TABLE(', confidence = 100 }]\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("pdfsplit").unwrap();
    cmd.arg(&pdf)
        .arg("--patterns")
        .arg(&patterns)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}
