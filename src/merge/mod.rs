//! PDF merging.
//!
//! - [`pages`]: copying pages into a fresh output page tree
//! - [`metadata`]: the output's document information dictionary
//! - [`executor`]: reading items and driving a whole merge

pub mod executor;
pub mod metadata;
pub mod pages;

pub use executor::{MIN_MERGE_ITEMS, MergeExecutor, MergeStatistics, MergedDocument};
pub use metadata::DocumentInfo;
pub use pages::OutputDocument;
