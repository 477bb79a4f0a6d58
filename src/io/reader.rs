//! Reading the raw bytes behind items.
//!
//! Path-backed items are read with `tokio::fs`; several reads may be in
//! flight at once, but results always come back in list order.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

use crate::error::{PdfStitchError, Result};
use crate::store::{FileSource, Item};

/// Raw bytes of one item, ready to be parsed.
#[derive(Debug, Clone)]
pub struct LoadedBytes {
    /// Display name of the item the bytes belong to.
    pub name: String,
    /// File contents.
    pub bytes: Arc<[u8]>,
}

/// Reader for item byte sources.
#[derive(Debug, Clone)]
pub struct ItemReader {
    /// Maximum number of reads in flight.
    jobs: usize,
}

impl ItemReader {
    /// Create a reader allowing `jobs` concurrent reads (at least one).
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    /// Create a reader that reads one file at a time.
    pub fn sequential() -> Self {
        Self::new(1)
    }

    /// Read the full contents of a single item.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::MergeFailed`] naming the item if the bytes
    /// cannot be read.
    pub async fn read(&self, item: &Item) -> Result<LoadedBytes> {
        let bytes: Arc<[u8]> = match &item.source {
            FileSource::Memory(bytes) => Arc::clone(bytes),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| {
                    PdfStitchError::merge_failed(format!(
                        "could not read '{}' ({}): {e}",
                        item.name,
                        path.display()
                    ))
                })?
                .into(),
        };

        debug!(name = %item.name, bytes = bytes.len(), "read item");

        Ok(LoadedBytes {
            name: item.name.clone(),
            bytes,
        })
    }

    /// Read every item, keeping list order.
    ///
    /// Stops at the first failure; no partial result is returned.
    pub async fn read_all(&self, items: &[Item]) -> Result<Vec<LoadedBytes>> {
        stream::iter(items.iter().map(|item| self.read(item)))
            .buffered(self.jobs)
            .try_collect()
            .await
    }
}

impl Default for ItemReader {
    fn default() -> Self {
        Self::sequential()
    }
}
