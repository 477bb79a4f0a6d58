//! CLI argument parsing for pdfstitch.
//!
//! This module defines the command-line interface structure using `clap`
//! and turns it into a validated [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Merging {} files", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{CompressionLevel, Config, MergeOptions, Metadata, OverwriteMode};
use crate::error::{PdfStitchError, Result};

/// Reorder PDF files and merge them into a single document.
///
/// Without files (or with --interactive) pdfstitch starts a small shell
/// where files can be added, reordered and removed before merging. With
/// files it merges them in the given order and exits. The result is
/// written as merged_<YYYY-MM-DD>.pdf in the output directory.
#[derive(Parser, Debug)]
#[command(name = "pdfstitch")]
#[command(version)]
#[command(about = "Reorder PDF files and merge them into a single document", long_about = None)]
#[command(author)]
pub struct Cli {
    /// PDF files to merge (in order)
    ///
    /// Paths or glob patterns. Files that are not PDFs are skipped.
    ///
    /// Examples:
    ///   pdfstitch cover.pdf report.pdf appendix.pdf
    ///   pdfstitch "scans/*.pdf" -o ~/Downloads
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Directory the merged PDF is written to
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "PDFSTITCH_OUTPUT_DIR",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// Overwrite an existing merged_<date>.pdf
    ///
    /// By default a free name such as "merged_<date> (1).pdf" is picked.
    #[arg(short, long)]
    pub force: bool,

    /// Fail instead of writing when merged_<date>.pdf already exists
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for the output PDF
    ///
    /// - none: streams are written as read
    /// - standard: compress uncompressed streams (default)
    /// - maximum: also drop empty streams
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of files read concurrently
    ///
    /// Default is the number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Set title metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Read additional input paths from a file (one per line)
    ///
    /// Empty lines and lines starting with '#' are ignored. Paths from
    /// the file come after the ones given on the command line.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Start the interactive shell, with any given files preloaded
    #[arg(short, long)]
    pub interactive: bool,

    /// Print machine-readable JSON instead of status lines
    #[arg(long)]
    pub json: bool,

    /// Show detailed statistics and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Input list files are not read here; see [`Cli::get_all_inputs`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::InvalidConfig`] if an argument is invalid
    /// or the resulting configuration fails validation.
    pub fn to_config(&self) -> Result<Config> {
        self.validate()?;

        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Rename
        };

        let config = Config {
            inputs: self.inputs.clone(),
            output_dir: self.output_dir.clone(),
            overwrite_mode,
            merge: MergeOptions {
                compression,
                metadata: Metadata::new(self.title.clone(), self.author.clone()),
                jobs: self.jobs,
            },
            interactive: self.interactive,
            json: self.json,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        config.validate().map_err(|e| {
            PdfStitchError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before building the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero job count, an unknown compression level
    /// or conflicting flags.
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfStitchError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if !["none", "standard", "maximum"].contains(&self.compression.as_str()) {
            return Err(PdfStitchError::invalid_config(format!(
                "Invalid compression level: {}",
                self.compression
            )));
        }

        if self.force && self.no_clobber {
            return Err(PdfStitchError::invalid_config(
                "Cannot use both --force and --no-clobber",
            ));
        }

        Ok(())
    }

    /// All inputs: command line first, then the input list file.
    ///
    /// # Errors
    ///
    /// Returns an error if the input list file cannot be read.
    pub async fn get_all_inputs(&self) -> Result<Vec<String>> {
        let mut all_inputs = self.inputs.clone();

        if let Some(list) = &self.input_list {
            all_inputs.extend(read_input_list(list).await?);
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a file, one per line.
async fn read_input_list(path: &Path) -> Result<Vec<String>> {
    use tokio::io::{AsyncBufReadExt, BufReader};

    let to_config_error = |e: std::io::Error| {
        PdfStitchError::invalid_config(format!(
            "Failed to read input list {}: {e}",
            path.display()
        ))
    };

    let file = tokio::fs::File::open(path).await.map_err(to_config_error)?;
    let mut lines = BufReader::new(file).lines();
    let mut inputs = Vec::new();

    while let Some(line) = lines.next_line().await.map_err(to_config_error)? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        inputs.push(line.to_string());
    }

    Ok(inputs)
}
