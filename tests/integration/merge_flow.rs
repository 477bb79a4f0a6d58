//! End-to-end merges through the library entry points.

use chrono::Local;
use tempfile::TempDir;

use pdfstitch::config::{CompressionLevel, Config, MergeOptions, Metadata, OverwriteMode};
use pdfstitch::error::PdfStitchError;
use pdfstitch::io::download_file_name;
use pdfstitch::store::FileHandle;

use crate::common::{arg, dir_entries, page_labels, pdf_bytes, session_in, write_pdf};

fn today_file_name() -> String {
    download_file_name(Local::now().date_naive())
}

#[tokio::test]
async fn test_two_documents_merge_in_list_order() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 2);
    let b = write_pdf(inputs.path(), "b.pdf", "B", 1);

    let mut session = session_in(out.path(), OverwriteMode::Rename);
    session.add_paths([arg(&a), arg(&b)]).await.unwrap();

    let report = session.run_merge().await.unwrap();

    assert_eq!(report.statistics.total_pages, 3);
    assert_eq!(report.receipt.path, out.path().join(today_file_name()));
    assert_eq!(page_labels(&report.receipt.path), ["A-1", "A-2", "B-1"]);
}

#[tokio::test]
async fn test_reordered_list_changes_page_order() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 2);
    let b = write_pdf(inputs.path(), "b.pdf", "B", 1);
    let c = write_pdf(inputs.path(), "c.pdf", "C", 1);

    let mut session = session_in(out.path(), OverwriteMode::Rename);
    let ids = session.add_paths([arg(&a), arg(&b), arg(&c)]).await.unwrap();
    assert!(session.move_item(&ids[2], &ids[0]));

    let report = session.run_merge().await.unwrap();
    assert_eq!(page_labels(&report.receipt.path), ["C-1", "A-1", "A-2", "B-1"]);
}

#[tokio::test]
async fn test_unparsable_file_aborts_without_output() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);
    let b = inputs.path().join("b.pdf");
    std::fs::write(&b, b"this is not a pdf").unwrap();

    let mut session = session_in(out.path(), OverwriteMode::Rename);
    session.add_paths([arg(&a), arg(&b)]).await.unwrap();
    let before: Vec<_> = session.store().items().iter().map(|i| i.id).collect();

    let err = session.run_merge().await.unwrap_err();

    assert!(matches!(err, PdfStitchError::MergeFailed { .. }));
    assert!(err.to_string().contains("b.pdf"));
    let after: Vec<_> = session.store().items().iter().map(|i| i.id).collect();
    assert_eq!(before, after);
    assert!(dir_entries(out.path()).is_empty());
}

#[tokio::test]
async fn test_mixed_batch_keeps_only_pdfs() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);

    let ids = session
        .add_files(vec![
            FileHandle::from_bytes("a.pdf", None, pdf_bytes("A", 1)),
            FileHandle::from_bytes("notes.txt", Some("text/plain"), b"hi".to_vec()),
            FileHandle::from_bytes("scan", Some("application/pdf"), pdf_bytes("S", 1)),
        ])
        .unwrap();

    assert_eq!(ids.len(), 2);
    let report = session.run_merge().await.unwrap();
    assert_eq!(page_labels(&report.receipt.path), ["A-1", "S-1"]);
}

#[tokio::test]
async fn test_second_merge_same_day_gets_new_name() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);
    session
        .add_files(vec![
            FileHandle::from_bytes("a.pdf", None, pdf_bytes("A", 1)),
            FileHandle::from_bytes("b.pdf", None, pdf_bytes("B", 1)),
        ])
        .unwrap();

    let first = session.run_merge().await.unwrap();
    let second = session.run_merge().await.unwrap();

    assert_ne!(first.receipt.path, second.receipt.path);
    let stem = today_file_name().trim_end_matches(".pdf").to_string();
    assert_eq!(
        second.receipt.path.file_name().unwrap().to_string_lossy(),
        format!("{stem} (1).pdf")
    );
}

#[tokio::test]
async fn test_no_clobber_refuses_existing_download() {
    let out = TempDir::new().unwrap();
    std::fs::write(out.path().join(today_file_name()), b"keep me").unwrap();

    let mut session = session_in(out.path(), OverwriteMode::NoClobber);
    session
        .add_files(vec![
            FileHandle::from_bytes("a.pdf", None, pdf_bytes("A", 1)),
            FileHandle::from_bytes("b.pdf", None, pdf_bytes("B", 1)),
        ])
        .unwrap();

    let err = session.run_merge().await.unwrap_err();
    assert!(matches!(err, PdfStitchError::OutputExists { .. }));
    assert_eq!(
        std::fs::read(out.path().join(today_file_name())).unwrap(),
        b"keep me"
    );
}

#[tokio::test]
async fn test_run_one_shot_config() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_pdf(inputs.path(), "01.pdf", "A", 1);
    write_pdf(inputs.path(), "02.pdf", "B", 2);
    std::fs::write(inputs.path().join("readme.txt"), b"skip me").unwrap();

    let config = Config {
        inputs: vec![arg(&inputs.path().join("*"))],
        output_dir: out.path().to_path_buf(),
        overwrite_mode: OverwriteMode::Rename,
        merge: MergeOptions {
            compression: CompressionLevel::Maximum,
            metadata: Metadata::new(Some("Bundle".into()), None),
            jobs: Some(2),
        },
        quiet: true,
        ..Default::default()
    };
    config.validate().unwrap();

    pdfstitch::run(config).await.unwrap();

    let output = out.path().join(today_file_name());
    assert_eq!(page_labels(&output), ["A-1", "B-1", "B-2"]);
}

#[tokio::test]
async fn test_run_one_shot_with_single_file_fails() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);

    let config = Config {
        inputs: vec![arg(&a)],
        output_dir: out.path().to_path_buf(),
        quiet: true,
        ..Default::default()
    };

    let err = pdfstitch::run(config).await.unwrap_err();
    assert!(matches!(err, PdfStitchError::TooFewItems { count: 1 }));
    assert_eq!(err.exit_code(), 1);
    assert!(dir_entries(out.path()).is_empty());
}

#[tokio::test]
async fn test_run_one_shot_missing_file() {
    let out = TempDir::new().unwrap();
    let config = Config {
        inputs: vec!["/nonexistent/a.pdf".into(), "/nonexistent/b.pdf".into()],
        output_dir: out.path().to_path_buf(),
        quiet: true,
        ..Default::default()
    };

    let err = pdfstitch::run(config).await.unwrap_err();
    assert!(matches!(err, PdfStitchError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}
