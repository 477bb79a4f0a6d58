//! I/O operations for pdfstitch.
//!
//! This module handles all file I/O operations:
//! - Reading the raw bytes behind selected items
//! - Writing the merged PDF as a local download
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::{DownloadWriter, ItemReader};
//! use pdfstitch::config::OverwriteMode;
//! use pdfstitch::store::Item;
//!
//! # async fn example(items: Vec<Item>) -> Result<(), Box<dyn std::error::Error>> {
//! let reader = ItemReader::new(4);
//! let loaded = reader.read_all(&items).await?;
//!
//! let writer = DownloadWriter::new(".", OverwriteMode::Rename);
//! writer
//!     .deliver(loaded[0].bytes.to_vec(), chrono::Local::now().date_naive())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{ItemReader, LoadedBytes};
pub use writer::{DownloadReceipt, DownloadWriter, download_file_name};
