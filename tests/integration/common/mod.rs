//! Shared helpers for the integration tests.
//!
//! Test documents are generated on the fly: every page draws a `LABEL-N`
//! string, so page order can be checked by reading content streams back.

use lopdf::content::Content;
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

use pdfstitch::config::OverwriteMode;
use pdfstitch::io::DownloadWriter;
use pdfstitch::merge::MergeExecutor;
use pdfstitch::session::Session;

/// Build an in-memory document with `pages` labelled pages.
pub fn labelled_document(label: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content = format!("BT /F1 10 Tf 50 750 Td ({label}-{n}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Serialized bytes of a labelled document.
pub fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    labelled_document(label, pages)
        .save_to(&mut bytes)
        .expect("Failed to serialize test PDF");
    bytes
}

/// Write a labelled document to `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(label, pages)).expect("Failed to write test PDF");
    path
}

/// Page labels of a PDF file, in page order.
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            Content::decode(&content)
                .expect("decodable content")
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| op.operands.first()?.as_str().ok())
                .map(|text| String::from_utf8_lossy(text).into_owned())
                .collect::<String>()
        })
        .collect()
}

/// Names of the files in a directory, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("readable dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A session writing downloads into `dir`.
pub fn session_in(dir: &Path, mode: OverwriteMode) -> Session {
    Session::new(MergeExecutor::default(), DownloadWriter::new(dir, mode))
}

/// Path string for shell commands and configs.
pub fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
