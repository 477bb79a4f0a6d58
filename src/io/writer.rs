//! Delivering the merged bytes as a local download.
//!
//! The merged document is written to `merged_<YYYY-MM-DD>.pdf` in the
//! output directory. Bytes go to a transient `.part` file first, which is
//! renamed into place once flushed and removed if anything fails, so a
//! half-written PDF never appears under the final name.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::writer::{DownloadWriter, download_file_name};
//! use pdfstitch::config::OverwriteMode;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = DownloadWriter::new("downloads", OverwriteMode::Rename);
//! let receipt = writer.deliver(bytes, chrono::Local::now().date_naive()).await?;
//! println!("Saved {}", receipt.path.display());
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info};

use crate::config::OverwriteMode;
use crate::error::{PdfStitchError, Result};
use crate::utils::format_file_size;

/// Prefix of every download file name.
pub const DOWNLOAD_PREFIX: &str = "merged";

/// Extension of every download file name.
pub const DOWNLOAD_EXTENSION: &str = "pdf";

/// Upper bound on `name (n).pdf` candidates tried in rename mode.
const MAX_RENAME_ATTEMPTS: u32 = 999;

/// Build the download file name for `date`: `merged_YYYY-MM-DD.pdf`.
pub fn download_file_name(date: NaiveDate) -> String {
    format!(
        "{DOWNLOAD_PREFIX}_{}.{DOWNLOAD_EXTENSION}",
        date.format("%Y-%m-%d")
    )
}

/// Where and how a download ended up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadReceipt {
    /// Final path of the written file.
    pub path: PathBuf,
    /// Size of the written file in bytes.
    pub file_size: u64,
    /// Time taken to write the file.
    #[serde(skip)]
    pub write_time: Duration,
}

impl DownloadReceipt {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes merged documents into an output directory.
#[derive(Debug, Clone)]
pub struct DownloadWriter {
    dir: PathBuf,
    overwrite_mode: OverwriteMode,
    buffer_size: usize,
}

impl DownloadWriter {
    /// Create a writer targeting `dir`.
    pub fn new(dir: impl Into<PathBuf>, overwrite_mode: OverwriteMode) -> Self {
        Self {
            dir: dir.into(),
            overwrite_mode,
            buffer_size: 8192,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` as the download for `date`.
    ///
    /// Ownership of the bytes ends here; they are dropped once written.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::OutputExists`] in no-clobber mode when the
    /// target exists, and [`PdfStitchError::FailedToWrite`] if the file
    /// cannot be created, written or moved into place.
    pub async fn deliver(&self, bytes: Vec<u8>, date: NaiveDate) -> Result<DownloadReceipt> {
        let dir = self.dir.clone();
        let overwrite_mode = self.overwrite_mode;
        let buffer_size = self.buffer_size;
        let file_name = download_file_name(date);

        let receipt = task::spawn_blocking(move || {
            let start = Instant::now();

            let path = resolve_target(&dir, &file_name, overwrite_mode)?;
            let part_path = path.with_extension(format!("{DOWNLOAD_EXTENSION}.part"));

            if let Err(err) = write_part(&part_path, &bytes, buffer_size)
                .and_then(|()| rename_into_place(&part_path, &path))
            {
                // Best effort: the transient file must not outlive a failed write.
                let _ = std::fs::remove_file(&part_path);
                return Err(err);
            }
            drop(bytes);

            let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

            Ok::<_, PdfStitchError>(DownloadReceipt {
                path,
                file_size,
                write_time: start.elapsed(),
            })
        })
        .await
        .map_err(|e| PdfStitchError::other(format!("Write task failed: {e}")))??;

        info!(
            path = %receipt.path.display(),
            size = receipt.file_size,
            "download written"
        );

        Ok(receipt)
    }
}

/// Pick the final path according to the overwrite mode.
fn resolve_target(dir: &Path, file_name: &str, mode: OverwriteMode) -> Result<PathBuf> {
    let path = dir.join(file_name);

    if !path.exists() {
        return Ok(path);
    }

    match mode {
        OverwriteMode::Force => {
            debug!(path = %path.display(), "overwriting existing download");
            Ok(path)
        }
        OverwriteMode::NoClobber => Err(PdfStitchError::output_exists(path)),
        OverwriteMode::Rename => {
            let stem = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| DOWNLOAD_PREFIX.to_string());

            (1..=MAX_RENAME_ATTEMPTS)
                .map(|n| dir.join(format!("{stem} ({n}).{DOWNLOAD_EXTENSION}")))
                .find(|candidate| !candidate.exists())
                .ok_or(PdfStitchError::output_exists(path))
        }
    }
}

fn write_part(part_path: &Path, bytes: &[u8], buffer_size: usize) -> Result<()> {
    let to_write_error = |source| PdfStitchError::FailedToWrite {
        path: part_path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(part_path).map_err(to_write_error)?;
    let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);
    writer.write_all(bytes).map_err(to_write_error)?;
    writer.flush().map_err(to_write_error)?;
    writer
        .into_inner()
        .map_err(|e| to_write_error(e.into_error()))?
        .sync_all()
        .map_err(to_write_error)?;

    Ok(())
}

fn rename_into_place(part_path: &Path, path: &Path) -> Result<()> {
    std::fs::rename(part_path, path).map_err(|source| PdfStitchError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    })
}
