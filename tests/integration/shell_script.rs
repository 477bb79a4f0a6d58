//! The interactive shell driven by scripted input.

use tempfile::TempDir;

use pdfstitch::config::OverwriteMode;
use pdfstitch::output::OutputFormatter;
use pdfstitch::session::{MergeStatus, NoticeKind};
use pdfstitch::shell::Shell;

use crate::common::{arg, dir_entries, page_labels, session_in, write_pdf};

#[tokio::test]
async fn test_script_reorders_and_merges() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 2);
    let b = write_pdf(inputs.path(), "b b.pdf", "B", 1);

    let session = session_in(out.path(), OverwriteMode::Rename);
    let mut shell = Shell::new(session, OutputFormatter::quiet(), Vec::new(), false);

    let script = format!(
        "add {} \"{}\"\nls\nmv 2 1\nmerge\nquit\n",
        arg(&a),
        arg(&b)
    );
    shell.run(script.as_bytes()).await.unwrap();

    assert_eq!(shell.session().status(), MergeStatus::Succeeded);
    let written = dir_entries(out.path());
    assert_eq!(written.len(), 1);
    assert_eq!(
        page_labels(&out.path().join(&written[0])),
        ["B-1", "A-1", "A-2"]
    );

    let printed = String::from_utf8(shell.output().clone()).unwrap();
    assert!(printed.contains("1. a.pdf"));
    assert!(printed.contains("1. b b.pdf"));
}

#[tokio::test]
async fn test_errors_do_not_end_the_session() {
    let inputs = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let a = write_pdf(inputs.path(), "a.pdf", "A", 1);
    let txt = inputs.path().join("notes.txt");
    std::fs::write(&txt, b"text").unwrap();

    let session = session_in(out.path(), OverwriteMode::Rename);
    let mut shell = Shell::new(session, OutputFormatter::quiet(), Vec::new(), false);

    let script = format!(
        "add {}\nadd {}\nmerge\nrm 9\nadd \"unterminated\nlist\n",
        arg(&txt),
        arg(&a)
    );
    shell.run(script.as_bytes()).await.unwrap();

    assert_eq!(shell.session().store().len(), 1);
    assert_eq!(shell.session().status(), MergeStatus::Failed);
    assert!(dir_entries(out.path()).is_empty());

    // The last failing command is still on screen; listing does not replace it.
    let notice = shell.session().notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.message.contains("Unterminated quote"));
}
