//! Core merge implementation.
//!
//! Reads an ordered list of items, copies every page of every document into
//! one fresh output document and serializes it. The merge is all or
//! nothing: any failure aborts it and no bytes are produced.

use lopdf::Document;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::{CompressionLevel, MergeOptions};
use crate::error::{PdfStitchError, Result};
use crate::io::{ItemReader, LoadedBytes};
use crate::merge::metadata::DocumentInfo;
use crate::merge::pages::OutputDocument;
use crate::store::Item;
use crate::utils::format_file_size;

/// Minimum number of items a merge accepts.
pub const MIN_MERGE_ITEMS: usize = 2;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of documents merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the inputs.
    pub input_size: u64,

    /// Size of the serialized output.
    pub output_size: u64,

    /// Time taken to read every input.
    pub load_time: Duration,

    /// Total time taken, reads included.
    pub merge_time: Duration,

    /// Number of inputs whose encryption entry was dropped.
    pub decrypted: usize,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Serialized output of a successful merge.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    /// Complete PDF file contents.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Merges item lists into a single PDF.
#[derive(Debug, Clone)]
pub struct MergeExecutor {
    reader: ItemReader,
    options: MergeOptions,
}

impl MergeExecutor {
    /// Create an executor for the given options.
    pub fn new(options: MergeOptions) -> Self {
        Self {
            reader: ItemReader::new(options.effective_jobs()),
            options,
        }
    }

    /// Options this executor merges with.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `items` in list order.
    ///
    /// Pages appear document by document, each document's pages in their
    /// natural order. The same file appearing twice contributes its pages
    /// twice.
    ///
    /// # Errors
    ///
    /// - [`PdfStitchError::TooFewItems`] with fewer than two items, before
    ///   anything is read
    /// - [`PdfStitchError::MergeFailed`] if any item cannot be read,
    ///   parsed or copied, or the output cannot be serialized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfstitch::merge::MergeExecutor;
    /// # use pdfstitch::config::MergeOptions;
    /// # use pdfstitch::store::Item;
    /// # async fn example(items: Vec<Item>) -> Result<(), Box<dyn std::error::Error>> {
    /// let executor = MergeExecutor::new(MergeOptions::default());
    /// let merged = executor.merge(&items).await?;
    /// println!("{} pages", merged.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(&self, items: &[Item]) -> Result<MergedDocument> {
        if items.len() < MIN_MERGE_ITEMS {
            return Err(PdfStitchError::TooFewItems { count: items.len() });
        }

        let merge_start = Instant::now();
        info!(items = items.len(), "merge started");

        let load_start = Instant::now();
        let loaded = self.reader.read_all(items).await?;
        let load_time = load_start.elapsed();
        debug!(?load_time, "inputs read");

        let input_size = loaded.iter().map(|l| l.bytes.len() as u64).sum();
        let options = self.options.clone();

        let (bytes, total_pages, decrypted) =
            task::spawn_blocking(move || merge_loaded(&loaded, &options))
                .await
                .map_err(|e| PdfStitchError::merge_failed(format!("Merge task failed: {e}")))??;

        let statistics = MergeStatistics {
            files_merged: items.len(),
            total_pages,
            input_size,
            output_size: bytes.len() as u64,
            load_time,
            merge_time: merge_start.elapsed(),
            decrypted,
        };

        info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            size = statistics.output_size,
            "merge finished"
        );

        Ok(MergedDocument { bytes, statistics })
    }
}

impl Default for MergeExecutor {
    fn default() -> Self {
        Self::new(MergeOptions::default())
    }
}

/// Parse, copy and serialize on a blocking worker.
fn merge_loaded(loaded: &[LoadedBytes], options: &MergeOptions) -> Result<(Vec<u8>, usize, usize)> {
    let mut output = OutputDocument::new();
    let mut decrypted = 0;

    for entry in loaded {
        let (document, dropped_encryption) = parse_document(entry)?;
        if dropped_encryption {
            decrypted += 1;
        }

        let pages = output.append_document(document).map_err(|e| {
            PdfStitchError::merge_failed(format!("could not copy pages of '{}': {e}", entry.name))
        })?;
        debug!(name = %entry.name, pages, "copied pages");
    }

    let total_pages = output.page_count();
    let mut document = output.finish()?;

    DocumentInfo::new(options.metadata.clone()).apply(&mut document);
    document.prune_objects();

    match options.compression {
        CompressionLevel::None => {}
        CompressionLevel::Standard => document.compress(),
        CompressionLevel::Maximum => {
            document.compress();
            document.delete_zero_length_streams();
        }
    }
    document.renumber_objects();

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| PdfStitchError::merge_failed(format!("could not serialize output: {e}")))?;

    Ok((bytes, total_pages, decrypted))
}

/// Load one input, dropping its encryption entry if present.
///
/// lopdf tries the empty user password while loading. When that fails the
/// objects stay encrypted and unparsed, so the document is rejected rather
/// than merged without its pages.
fn parse_document(entry: &LoadedBytes) -> Result<(Document, bool)> {
    let mut document = Document::load_mem(&entry.bytes).map_err(|e| {
        PdfStitchError::merge_failed(format!("could not parse '{}': {e}", entry.name))
    })?;

    let encrypted = document.is_encrypted();
    if encrypted {
        if document.encryption_state.is_none() {
            return Err(PdfStitchError::merge_failed(format!(
                "could not decrypt '{}': a password is required",
                entry.name
            )));
        }
        warn!(name = %entry.name, "ignoring document encryption");
        document.trailer.remove(b"Encrypt");
    }

    if document.get_pages().is_empty() {
        return Err(PdfStitchError::merge_failed(format!(
            "could not parse '{}': no pages found",
            entry.name
        )));
    }

    Ok((document, encrypted))
}
