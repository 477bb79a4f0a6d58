//! Ordered item store.
//!
//! Holds the files selected for merging in the order their pages will
//! appear in the output. Items are addressed by their [`ItemId`], never by
//! position, so removal and reordering cannot hit the wrong entry even when
//! two files share a name.
//!
//! # Examples
//!
//! ```
//! use pdfstitch::store::{FileHandle, ItemStore};
//!
//! let mut store = ItemStore::new();
//! let ids = store
//!     .append(vec![
//!         FileHandle::from_bytes("a.pdf", None, b"%PDF-1.4".to_vec()),
//!         FileHandle::from_bytes("b.pdf", None, b"%PDF-1.4".to_vec()),
//!     ])
//!     .unwrap();
//!
//! store.move_item(&ids[1], &ids[0]);
//! assert_eq!(store.items()[0].name, "b.pdf");
//! ```

pub mod item;

pub use item::{FileHandle, FileSource, Item, ItemId};

use serde::Serialize;
use tracing::debug;

use crate::error::{PdfStitchError, Result};
use crate::utils::{bytes_to_megabytes, format_file_size};

/// Display totals derived from the current list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    /// Number of items.
    pub count: usize,
    /// Sum of item sizes in bytes.
    pub total_bytes: u64,
    /// Sum of item sizes in megabytes, rounded to one decimal place.
    pub total_mb: f64,
}

/// One row of a listing, as shown to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    /// 1-based position in the list.
    pub position: usize,
    /// Item id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Human readable size.
    pub size: String,
}

/// Ordered list of items with unique ids.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the PDF files from `files`, preserving their order.
    ///
    /// Files that are not PDFs (by declared media type or extension) are
    /// dropped. Each accepted file gets a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::NoValidFiles`] when `files` is non-empty but
    /// contains no PDF; the store is left unchanged in that case. An empty
    /// batch is a no-op.
    pub fn append<I>(&mut self, files: I) -> Result<Vec<ItemId>>
    where
        I: IntoIterator<Item = FileHandle>,
    {
        let mut rejected = 0;
        let accepted: Vec<Item> = files
            .into_iter()
            .filter(|file| {
                let keep = file.is_pdf();
                if !keep {
                    debug!(name = %file.name, "skipping non-PDF file");
                    rejected += 1;
                }
                keep
            })
            .map(Item::from_handle)
            .collect();

        if accepted.is_empty() {
            return if rejected > 0 {
                Err(PdfStitchError::NoValidFiles { rejected })
            } else {
                Ok(Vec::new())
            };
        }

        let ids: Vec<ItemId> = accepted.iter().map(|item| item.id).collect();
        debug!(added = ids.len(), rejected, "appended items");
        self.items.extend(accepted);

        Ok(ids)
    }

    /// Remove the item with `id`.
    ///
    /// Returns the removed item, or `None` if no item has that id.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Move the item `id` to the slot currently held by `target`.
    ///
    /// Items between the two positions shift by one toward the vacated
    /// slot. Returns `false` without changing anything if either id is
    /// unknown or both are the same.
    pub fn move_item(&mut self, id: &ItemId, target: &ItemId) -> bool {
        if id == target {
            return false;
        }

        let (Some(from), Some(to)) = (self.position(id), self.position(target)) else {
            return false;
        };

        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in list order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Owned copy of the items in list order.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// 0-based position of `id` in the list.
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Check whether an item with `id` is present.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item sizes in bytes.
    pub fn total_size_bytes(&self) -> u64 {
        self.items.iter().map(|item| item.size_bytes).sum()
    }

    /// Sum of all item sizes in megabytes, rounded to one decimal place.
    pub fn total_size_mb(&self) -> f64 {
        bytes_to_megabytes(self.total_size_bytes())
    }

    /// Totals for display.
    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            count: self.len(),
            total_bytes: self.total_size_bytes(),
            total_mb: self.total_size_mb(),
        }
    }

    /// Rows for display, in list order.
    pub fn views(&self) -> Vec<ItemView> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemView {
                position: index + 1,
                id: item.id,
                name: item.name.clone(),
                size_bytes: item.size_bytes,
                size: format_file_size(item.size_bytes),
            })
            .collect()
    }
}
