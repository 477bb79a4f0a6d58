//! Error types for pdfstitch.
//!
//! Every fallible operation in the crate returns [`PdfStitchError`]. The
//! session keeps running after any recoverable error: the item store is
//! never modified by a failed action, so the user can fix the selection
//! and try again.
//!
//! # Error Categories
//!
//! - **Selection Errors**: nothing usable was picked, or too few items to merge
//! - **Merge Errors**: reading, parsing, copying or serializing a document failed
//! - **Output Errors**: the merged file could not be written
//! - **Configuration Errors**: invalid arguments or environment

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfstitch operations.
pub type Result<T> = std::result::Result<T, PdfStitchError>;

/// Main error type for pdfstitch operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfStitchError {
    /// A non-empty selection contained no PDF documents.
    #[error("No PDF files in selection ({rejected} file(s) skipped)")]
    NoValidFiles {
        /// Number of files that were rejected by the type filter.
        rejected: usize,
    },

    /// A merge was requested with fewer than two items.
    #[error("Add at least two PDF files to merge (currently {count})")]
    TooFewItems {
        /// Number of items in the list when the merge was requested.
        count: usize,
    },

    /// Reading, parsing, copying or serializing failed during a merge.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of the underlying cause.
        reason: String,
    },

    /// A merge was started while another one is still running.
    #[error("A merge is already in progress")]
    MergeInProgress,

    /// A picked file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The download target exists and overwriting is disabled.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or drop --no-clobber",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Writing the merged document failed.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PdfStitchError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfStitchError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if the session can carry on after this error.
    ///
    /// Recoverable errors are shown to the user and the next action
    /// replaces the message; nothing else is rolled back because nothing
    /// was changed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoValidFiles { .. }
                | Self::TooFewItems { .. }
                | Self::MergeFailed { .. }
                | Self::MergeInProgress
                | Self::FileNotFound { .. }
                | Self::OutputExists { .. }
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoValidFiles { .. } => 1,
            Self::TooFewItems { .. } => 1,
            Self::MergeFailed { .. } => 6,
            Self::MergeInProgress => 6,
            Self::FileNotFound { .. } => 2,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
