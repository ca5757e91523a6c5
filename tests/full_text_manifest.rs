//! Integration tests for full-text manifests.

use std::fs;

use gtprep::convert::{convert_full_text, run_pass, FileStatus, IssueCode};
use gtprep::gt::TextEncoding;
use gtprep::GtPrepError;

mod common;
use common::{create_receipts, full_text_config, write_gt, write_jpeg};

#[test]
fn writes_one_row_per_image_in_sorted_order() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_receipts(temp.path());
    let config = full_text_config(temp.path());

    let report = convert_full_text("train", &config).expect("convert");
    let manifest = fs::read_to_string(&config.output).expect("read manifest");

    assert_eq!(
        manifest,
        "images/r1.jpg\tGROCERY MART TOTAL 12.50\n\
         images/r2.jpg\tHello, World tiny outside\n"
    );
    assert_eq!(report.counts.annotation_files, 3);
    assert_eq!(report.counts.processed_files, 2);
    assert_eq!(report.counts.rows_written, 2);
    assert_eq!(report.dropped.malformed, 1);
}

#[test]
fn missing_image_skips_exactly_one_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_receipts(temp.path());
    let config = full_text_config(temp.path());

    let report = convert_full_text("train", &config).expect("convert");

    assert_eq!(report.counts.skipped_files, 1);
    assert_eq!(
        report.file("r3").map(|r| r.status),
        Some(FileStatus::Skipped {
            reason: IssueCode::ImageNotFound
        })
    );
    let manifest = fs::read_to_string(&config.output).expect("read manifest");
    assert!(!manifest.contains("r3"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let temp = tempfile::tempdir().expect("create temp dir");
    create_receipts(temp.path());
    let config = full_text_config(temp.path());

    convert_full_text("first", &config).expect("first run");
    let first = fs::read(&config.output).expect("read first");
    convert_full_text("second", &config).expect("second run");
    let second = fs::read(&config.output).expect("read second");

    assert_eq!(first, second);
}

#[test]
fn per_file_encoding_is_reported() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let config = full_text_config(temp.path());
    write_jpeg(&config.images_dir.join("menu.jpg"), 20, 20);
    write_gt(
        &config.gt_dir.join("menu.txt"),
        b"1,1,10,1,10,10,1,10,Cr\xE8me br\xFBl\xE9e\n".as_slice(),
    );
    write_jpeg(&config.images_dir.join("plain.jpg"), 20, 20);
    write_gt(&config.gt_dir.join("plain.txt"), "1,1,10,1,10,10,1,10,Tea\n");

    let report = convert_full_text("t", &config).expect("convert");
    assert_eq!(
        report.file("menu").and_then(|r| r.encoding),
        Some(TextEncoding::Latin1)
    );
    assert_eq!(
        report.file("plain").and_then(|r| r.encoding),
        Some(TextEncoding::Utf8)
    );

    let manifest = fs::read_to_string(&config.output).expect("manifest is utf-8");
    assert!(manifest.contains("images/menu.jpg\tCrème brûlée\n"));
}

#[test]
fn undecodable_file_is_skipped_with_warning() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut config = full_text_config(temp.path());
    config.encodings = vec![TextEncoding::Utf8];
    write_jpeg(&config.images_dir.join("menu.jpg"), 20, 20);
    write_gt(
        &config.gt_dir.join("menu.txt"),
        b"1,1,10,1,10,10,1,10,Cr\xE8me\n".as_slice(),
    );

    let report = convert_full_text("t", &config).expect("convert");
    assert_eq!(report.counts.skipped_files, 1);
    assert_eq!(report.issues[0].code, IssueCode::AnnotationUndecodable);
    assert_eq!(report.file("menu").and_then(|r| r.encoding), None);
    assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
}

#[test]
fn empty_gt_dir_writes_empty_manifest() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let config = full_text_config(temp.path());
    fs::create_dir_all(&config.gt_dir).unwrap();

    let report = convert_full_text("t", &config).expect("convert");
    assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
    assert_eq!(report.issues[0].code, IssueCode::NoAnnotationFiles);
}

#[test]
fn custom_prefix_and_extension() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut config = full_text_config(temp.path());
    config.image_extension = "png".to_string();
    config.image_prefix = "val/imgs".to_string();
    fs::create_dir_all(&config.images_dir).unwrap();
    fs::write(config.images_dir.join("a.png"), b"png bytes").unwrap();
    write_gt(&config.gt_dir.join("a.txt"), "1,1,10,1,10,10,1,10,Hi\n");

    run_pass("t", &config).expect("convert");
    assert_eq!(
        fs::read_to_string(&config.output).unwrap(),
        "val/imgs/a.png\tHi\n"
    );
}

#[test]
fn unwritable_output_is_an_error() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let mut config = full_text_config(temp.path());
    // A directory where the manifest file should go.
    fs::create_dir_all(temp.path().join("gt.txt")).unwrap();
    config.output = temp.path().join("gt.txt");

    let err = convert_full_text("t", &config).unwrap_err();
    assert!(matches!(err, GtPrepError::ManifestCreate { .. }));
}
