//! Document information dictionary for merged output.
//!
//! Source documents' Info dictionaries are never carried over; the output
//! gets a fresh one naming pdfstitch as creator and producer.

use chrono::{DateTime, Local};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::Metadata;

/// Creator/Producer string stamped on every merged document.
pub const PRODUCER: &str = "pdfstitch";

/// Info dictionary contents for one merged document.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    metadata: Metadata,
    created: DateTime<Local>,
}

impl DocumentInfo {
    /// Info stamped with the current local time.
    pub fn new(metadata: Metadata) -> Self {
        Self::at(metadata, Local::now())
    }

    /// Info stamped with an explicit creation time.
    pub fn at(metadata: Metadata, created: DateTime<Local>) -> Self {
        Self { metadata, created }
    }

    /// Replace the document's Info dictionary with this one.
    pub fn apply(&self, doc: &mut Document) {
        let mut info = Dictionary::new();

        if let Some(title) = &self.metadata.title {
            info.set("Title", literal(title));
        }
        if let Some(author) = &self.metadata.author {
            info.set("Author", literal(author));
        }

        info.set("Creator", literal(PRODUCER));
        info.set("Producer", literal(PRODUCER));

        let date = format_pdf_date(&self.created);
        info.set("CreationDate", literal(&date));
        info.set("ModDate", literal(&date));

        let info_id = doc.add_object(info);
        doc.trailer.set("Info", Object::Reference(info_id));
    }
}

fn literal(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// Format a timestamp as a PDF date string: `D:YYYYMMDDHHmmSS+HH'mm'`.
pub fn format_pdf_date(time: &DateTime<Local>) -> String {
    let offset = time.format("%:z").to_string().replacen(':', "'", 1);
    format!("D:{}{offset}'", time.format("%Y%m%d%H%M%S"))
}
