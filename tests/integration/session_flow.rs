//! Merge state machine behaviour across whole sessions.

use tempfile::TempDir;

use pdfstitch::config::OverwriteMode;
use pdfstitch::error::PdfStitchError;
use pdfstitch::session::{MergeStatus, NoticeKind};
use pdfstitch::store::FileHandle;

use crate::common::{dir_entries, page_labels, pdf_bytes, session_in};

fn handles(labels: &[&str]) -> Vec<FileHandle> {
    labels
        .iter()
        .map(|label| FileHandle::from_bytes(format!("{label}.pdf"), None, pdf_bytes(label, 1)))
        .collect()
}

#[tokio::test]
async fn test_state_machine_round_trip() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);
    assert_eq!(session.status(), MergeStatus::Idle);

    // Failure first: too few items.
    session.add_files(handles(&["A"])).unwrap();
    assert!(session.run_merge().await.is_err());
    assert_eq!(session.status(), MergeStatus::Failed);
    assert_eq!(session.notice().unwrap().kind, NoticeKind::Error);

    // Then success.
    session.add_files(handles(&["B"])).unwrap();
    let job = session.begin_merge().unwrap();
    assert_eq!(session.status(), MergeStatus::Merging);
    assert!(session.notice().is_none());

    let outcome = job.run().await;
    session.complete_merge(outcome).unwrap();
    assert_eq!(session.status(), MergeStatus::Succeeded);
    assert_eq!(session.notice().unwrap().kind, NoticeKind::Success);

    session.dismiss();
    assert!(session.notice().is_none());
    assert_eq!(session.status(), MergeStatus::Succeeded);
}

#[tokio::test]
async fn test_busy_flag_refuses_concurrent_merge() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);
    session.add_files(handles(&["A", "B"])).unwrap();

    let job = session.begin_merge().unwrap();
    for _ in 0..3 {
        assert!(matches!(
            session.begin_merge(),
            Err(PdfStitchError::MergeInProgress)
        ));
    }

    // Abandoning a job releases the flag.
    drop(job);
    assert_eq!(session.status(), MergeStatus::Idle);
    assert!(session.begin_merge().is_ok());
}

#[tokio::test]
async fn test_job_uses_snapshot_taken_at_start() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);
    let ids = session.add_files(handles(&["A", "B", "C"])).unwrap();

    let job = session.begin_merge().unwrap();
    session.remove(&ids[1]);
    assert!(session.move_item(&ids[2], &ids[0]));

    let report = session.complete_merge(job.run().await).unwrap();

    assert_eq!(page_labels(&report.receipt.path), ["A-1", "B-1", "C-1"]);
    let names: Vec<&str> = session
        .store()
        .items()
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, ["C.pdf", "A.pdf"]);
}

#[tokio::test]
async fn test_clear_then_merge_is_too_few() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);
    session.add_files(handles(&["A", "B"])).unwrap();
    session.clear();

    let err = session.run_merge().await.unwrap_err();
    assert!(matches!(err, PdfStitchError::TooFewItems { count: 0 }));
    assert!(err.is_recoverable());
    assert!(dir_entries(out.path()).is_empty());
}

#[test]
fn test_totals_follow_mutations() {
    let out = TempDir::new().unwrap();
    let mut session = session_in(out.path(), OverwriteMode::Rename);

    let ids = session
        .add_files(vec![
            FileHandle::from_bytes("a.pdf", None, vec![0; 1_048_576]),
            FileHandle::from_bytes("b.pdf", None, vec![0; 524_288]),
        ])
        .unwrap();
    assert_eq!(session.store().total_size_mb(), 1.5);

    session.remove(&ids[0]);
    assert_eq!(session.store().total_size_mb(), 0.5);

    session.clear();
    assert_eq!(session.store().total_size_mb(), 0.0);
}
