//! Page copying into the output document.
//!
//! The output starts as an empty document with a single flat page tree.
//! Source documents are appended one after another; each of their pages is
//! copied with everything it references and re-parented onto the output
//! tree, so the output never shares structure with a source tree.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::debug;

use crate::error::{PdfStitchError, Result};
use crate::utils::copy_references;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Output document under construction.
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Create an empty output document (catalog plus empty page tree).
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");

        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages copied so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append every page of `source`, in natural page order.
    ///
    /// Returns the number of pages copied.
    ///
    /// # Errors
    ///
    /// Returns an error if a page object is missing or is not a dictionary.
    pub fn append_document(&mut self, mut source: Document) -> Result<usize> {
        // Move the source into an id range that cannot collide with ours.
        source.renumber_objects_with(self.document.max_id + 1);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        for &page_id in &page_ids {
            self.copy_page(&source, page_id)?;
        }

        self.document.max_id = self.document.max_id.max(source.max_id);
        debug!(pages = page_ids.len(), "appended document");

        Ok(page_ids.len())
    }

    fn copy_page(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        let mut page = source
            .get_dictionary(page_id)
            .map_err(|e| PdfStitchError::merge_failed(format!("Failed to get page: {e}")))?
            .clone();

        for key in INHERITABLE_ATTRIBUTES {
            if !page.has(key)
                && let Some(value) = inherited_attribute(source, page_id, key)
            {
                page.set(key.to_vec(), value);
            }
        }
        page.set("Parent", Object::Reference(self.pages_id));

        // Insert the page before walking it so back references (annotation
        // /P entries) resolve to this copy.
        let page = Object::Dictionary(page);
        self.document.objects.insert(page_id, page.clone());
        copy_references(&mut self.document, source, &page);

        self.kids.push(page_id);
        Ok(())
    }

    /// Write the page tree and hand over the finished document.
    ///
    /// # Errors
    ///
    /// Returns an error if the page tree root has been replaced by
    /// something other than a dictionary.
    pub fn finish(mut self) -> Result<Document> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();

        match self.document.get_object_mut(self.pages_id) {
            Ok(Object::Dictionary(pages)) => {
                pages.set("Kids", Object::Array(kids));
                pages.set("Count", Object::Integer(self.kids.len() as i64));
            }
            _ => {
                return Err(PdfStitchError::merge_failed(
                    "Pages object is not a dictionary",
                ));
            }
        }

        Ok(self.document)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up `key` on the page or the nearest ancestor that defines it.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node: &Dictionary = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent_id = node.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
    }

    None
}
