//! Output formatting and display for pdfstitch.
//!
//! - Status messages (quiet and verbose aware, colored on a TTY)
//! - Item listings and store totals
//! - Merge reports, as text or JSON
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::output::OutputFormatter;
//! use pdfstitch::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, render_item, render_summary};

use serde::Serialize;
use std::path::PathBuf;

use crate::session::MergeReport;
use crate::store::{ItemView, StoreSummary};

/// JSON shape of a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingJson {
    /// Items in list order.
    pub items: Vec<ItemView>,
    /// Totals.
    pub summary: StoreSummary,
}

/// JSON shape of a merge report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReportJson {
    /// Written file.
    pub path: PathBuf,
    /// Written size in bytes.
    pub file_size: u64,
    /// Number of documents merged.
    pub files_merged: usize,
    /// Pages in the output.
    pub total_pages: usize,
    /// Summed input size in bytes.
    pub input_size: u64,
}

impl From<&MergeReport> for MergeReportJson {
    fn from(report: &MergeReport) -> Self {
        Self {
            path: report.receipt.path.clone(),
            file_size: report.receipt.file_size,
            files_merged: report.statistics.files_merged,
            total_pages: report.statistics.total_pages,
            input_size: report.statistics.input_size,
        }
    }
}

/// Serialize a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> crate::Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| crate::PdfStitchError::other(format!("Failed to serialize JSON: {e}")))
}
