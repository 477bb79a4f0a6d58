//! Items and the file handles they are created from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{PdfStitchError, Result};

/// Media type accepted by the store.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// File extension accepted by the store (compared case-insensitively).
pub const PDF_EXTENSION: &str = "pdf";

/// Stable identifier of an item.
///
/// Generated once when the item is appended and never recomputed, so it
/// stays valid across reorders and is independent of the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell items apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Check whether the id's hex form (with or without hyphens) starts with `prefix`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.to_ascii_lowercase();
        !prefix.is_empty()
            && (self.0.simple().to_string().starts_with(&prefix)
                || self.0.hyphenated().to_string().starts_with(&prefix))
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = PdfStitchError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| PdfStitchError::other(format!("Invalid item id '{s}': {e}")))
    }
}

/// Where the raw bytes of a file come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file on disk, read when a merge runs.
    Path(PathBuf),
    /// Bytes already held in memory.
    Memory(Arc<[u8]>),
}

/// A raw file as handed over by a picker or drop zone, before it is accepted.
#[derive(Debug, Clone)]
pub struct FileHandle {
    /// Display name (usually the file name).
    pub name: String,
    /// Declared media type, if the source provided one.
    pub media_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Byte source.
    pub source: FileSource,
}

impl FileHandle {
    /// Create a handle for a file on disk.
    ///
    /// The file must exist; its size is taken from the filesystem metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::FileNotFound`] if the path does not exist
    /// and an I/O error if it is not a regular file or cannot be inspected.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PdfStitchError::file_not_found(path.to_path_buf())
            } else {
                PdfStitchError::from(e)
            }
        })?;

        if !metadata.is_file() {
            return Err(PdfStitchError::other(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            media_type: None,
            size_bytes: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Create a handle for bytes already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: Option<&str>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            size_bytes: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Check whether the declared type or the file extension says PDF.
    pub fn is_pdf(&self) -> bool {
        let declared = self.media_type.as_deref().is_some_and(|media_type| {
            media_type
                .split(';')
                .next()
                .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        });

        declared
            || Path::new(&self.name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
    }
}

/// One accepted file in the ordered list.
#[derive(Debug, Clone)]
pub struct Item {
    /// Stable identifier, unique within the store.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Declared media type, if any.
    pub media_type: Option<String>,
    /// Byte source.
    pub source: FileSource,
}

impl Item {
    pub(crate) fn from_handle(handle: FileHandle) -> Self {
        Self {
            id: ItemId::new(),
            name: handle.name,
            size_bytes: handle.size_bytes,
            media_type: handle.media_type,
            source: handle.source,
        }
    }

    /// Path of the source file, if the item is backed by one.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path),
            FileSource::Memory(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("report.pdf", None, true)]
    #[case("REPORT.PDF", None, true)]
    #[case("scan.Pdf", None, true)]
    #[case("notes.txt", None, false)]
    #[case("archive.pdf.zip", None, false)]
    #[case("pdf", None, false)]
    #[case("blob", Some("application/pdf"), true)]
    #[case("blob", Some("Application/PDF; charset=binary"), true)]
    #[case("image.png", Some("image/png"), false)]
    #[case("mislabelled.pdf", Some("application/octet-stream"), true)]
    fn test_is_pdf(#[case] name: &str, #[case] media_type: Option<&str>, #[case] expected: bool) {
        let handle = FileHandle::from_bytes(name, media_type, vec![0u8; 4]);
        assert_eq!(handle.is_pdf(), expected);
    }

    #[test]
    fn test_from_bytes_size() {
        let handle = FileHandle::from_bytes("a.pdf", None, vec![1u8, 2, 3]);
        assert_eq!(handle.size_bytes, 3);
        assert!(matches!(handle.source, FileSource::Memory(_)));
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let handle = FileHandle::from_path(&path).await.unwrap();
        assert_eq!(handle.name, "doc.pdf");
        assert_eq!(handle.size_bytes, 8);
        assert!(handle.is_pdf());
    }

    #[tokio::test]
    async fn test_from_path_missing() {
        let result = FileHandle::from_path("/nonexistent/missing.pdf").await;
        assert!(matches!(result, Err(PdfStitchError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_from_path_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(FileHandle::from_path(dir.path()).await.is_err());
    }

    #[test]
    fn test_item_ids_are_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_item_id_prefix() {
        let id = ItemId::new();
        let full = id.to_string();
        assert!(id.matches_prefix(&id.short()));
        assert!(id.matches_prefix(&full[..12]));
        assert!(id.matches_prefix(&full.to_uppercase()[..6]));
        assert!(!id.matches_prefix(""));
        assert_eq!(full.parse::<ItemId>().unwrap(), id);
    }
}
