//! Configuration module for pdfstitch.
//!
//! This module transforms CLI arguments into a validated, normalized configuration
//! that drives the session. It handles:
//! - Validation of argument combinations
//! - Resolution of conflicting options
//! - Application of defaults

use anyhow::{Result, bail};

use crate::PdfStitchError;
use std::{path::PathBuf, str::FromStr};

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they were read.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress, then delete zero-length streams.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = crate::PdfStitchError;

    /// Parse compression level from "none", "standard", or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfStitchError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
}

impl Metadata {
    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        let to_string_opt = |opt: Option<String>| {
            opt.filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        Self {
            title: to_string_opt(title),
            author: to_string_opt(author),
        }
    }

    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }
}

/// What to do when the download name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Pick the next free `merged_<date> (n).pdf` name (default).
    #[default]
    Rename,
    /// Always overwrite.
    Force,
    /// Never overwrite, error if the file exists.
    NoClobber,
}

/// Options that shape the merged document itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Compression applied before serializing.
    pub compression: CompressionLevel,
    /// Metadata stamped on the output.
    pub metadata: Metadata,
    /// Number of concurrent file reads (None = auto-detect).
    pub jobs: Option<usize>,
}

impl MergeOptions {
    /// Get the effective number of concurrent reads.
    ///
    /// Returns the configured count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Complete configuration for a pdfstitch session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files given up front (paths or glob patterns), in merge order.
    pub inputs: Vec<String>,

    /// Directory the merged PDF is written to.
    pub output_dir: PathBuf,

    /// Download name collision behavior.
    pub overwrite_mode: OverwriteMode,

    /// Merge settings.
    pub merge: MergeOptions,

    /// Run the interactive shell.
    pub interactive: bool,

    /// Print machine-readable JSON summaries.
    pub json: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: PathBuf::from("."),
            overwrite_mode: OverwriteMode::default(),
            merge: MergeOptions::default(),
            interactive: false,
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output directory exists but is not a directory
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.merge.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            bail!(
                "Output directory is not a directory: {}",
                self.output_dir.display()
            );
        }

        Ok(())
    }

    /// Whether the session should start in interactive mode.
    ///
    /// Without any input files there is nothing to merge in one shot.
    pub fn is_interactive(&self) -> bool {
        self.interactive || self.inputs.is_empty()
    }

    /// Check if status lines should be printed.
    ///
    /// JSON mode keeps stdout for machine-readable output only.
    pub fn should_print(&self) -> bool {
        !self.quiet && !self.json
    }
}
