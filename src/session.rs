//! Interactive merge session.
//!
//! A [`Session`] owns the item list and tracks the merge state machine:
//!
//! ```text
//! Idle --begin_merge--> Merging --complete_merge--> Succeeded | Failed
//! ```
//!
//! `Succeeded` and `Failed` are idle states that remember the last
//! outcome. While a merge runs, the list stays editable: the running
//! [`MergeJob`] works on a snapshot taken when it started. A second merge
//! is refused until the first one has finished.

use chrono::Local;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PdfStitchError, Result};
use crate::io::{DownloadReceipt, DownloadWriter};
use crate::merge::{MIN_MERGE_ITEMS, MergeExecutor, MergeStatistics};
use crate::store::{FileHandle, Item, ItemId, ItemStore};
use crate::utils::collect_paths_for_patterns;

/// Single busy flag shared by a session and its running job.
#[derive(Debug, Clone, Default)]
pub struct MergeGate {
    busy: Arc<AtomicBool>,
}

impl MergeGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a merge currently holds the gate.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Take the gate, failing if a merge already holds it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::MergeInProgress`] if the gate is taken.
    pub fn try_acquire(&self) -> Result<MergeGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PdfStitchError::MergeInProgress)?;

        Ok(MergeGuard {
            busy: Arc::clone(&self.busy),
        })
    }
}

/// Holds the gate; releases it when dropped.
#[derive(Debug)]
pub struct MergeGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for MergeGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Where the session is in the merge state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// No merge has run yet.
    Idle,
    /// A merge is running.
    Merging,
    /// Idle; the last merge produced a download.
    Succeeded,
    /// Idle; the last merge failed.
    Failed,
}

/// Kind of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Something worked.
    Success,
    /// Something went wrong; the list is unchanged.
    Error,
}

/// Dismissible message about the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Kind of notice.
    pub kind: NoticeKind,
    /// Message text.
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(err: &PdfStitchError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: err.to_string(),
        }
    }
}

/// What a successful merge produced.
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Where the download was written.
    pub receipt: DownloadReceipt,
    /// Merge statistics.
    pub statistics: MergeStatistics,
}

/// A merge that has been started and not yet run.
///
/// Holds its own copy of the item list, so the session can keep editing
/// while it runs. The session stays in [`MergeStatus::Merging`] until the
/// job is dropped.
#[derive(Debug)]
pub struct MergeJob {
    items: Vec<Item>,
    executor: MergeExecutor,
    writer: DownloadWriter,
    _guard: MergeGuard,
}

impl MergeJob {
    /// Items being merged, in merge order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Merge the snapshot and write the download.
    ///
    /// # Errors
    ///
    /// Returns the executor's or writer's error; nothing is written on a
    /// merge failure.
    pub async fn run(self) -> Result<MergeReport> {
        let merged = self.executor.merge(&self.items).await?;
        let statistics = merged.statistics;

        let receipt = self
            .writer
            .deliver(merged.bytes, Local::now().date_naive())
            .await?;

        Ok(MergeReport {
            receipt,
            statistics,
        })
    }
}

/// An interactive merge session.
#[derive(Debug)]
pub struct Session {
    store: ItemStore,
    gate: MergeGate,
    executor: MergeExecutor,
    writer: DownloadWriter,
    notice: Option<Notice>,
    last_succeeded: Option<bool>,
}

impl Session {
    /// Create a session with an empty list.
    pub fn new(executor: MergeExecutor, writer: DownloadWriter) -> Self {
        Self {
            store: ItemStore::new(),
            gate: MergeGate::new(),
            executor,
            writer,
            notice: None,
            last_succeeded: None,
        }
    }

    /// Create a session from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            MergeExecutor::new(config.merge.clone()),
            DownloadWriter::new(&config.output_dir, config.overwrite_mode),
        )
    }

    /// The item list.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Current merge state.
    pub fn status(&self) -> MergeStatus {
        if self.gate.is_busy() {
            return MergeStatus::Merging;
        }
        match self.last_succeeded {
            None => MergeStatus::Idle,
            Some(true) => MergeStatus::Succeeded,
            Some(false) => MergeStatus::Failed,
        }
    }

    /// Whether a merge is running.
    pub fn is_merging(&self) -> bool {
        self.gate.is_busy()
    }

    /// Message about the last action, if not dismissed.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Dismiss the current notice. The recorded merge outcome stays.
    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    /// Show an error raised outside the session, such as a bad command,
    /// as the current notice.
    pub fn report_error(&mut self, err: &PdfStitchError) {
        self.notice = Some(Notice::error(err));
    }

    /// Add picked files to the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::NoValidFiles`] if the batch held no PDF.
    pub fn add_files<I>(&mut self, files: I) -> Result<Vec<ItemId>>
    where
        I: IntoIterator<Item = FileHandle>,
    {
        let result = self.store.append(files);
        self.record(&result, |ids| format!("Added {} file(s)", ids.len()));
        result
    }

    /// Resolve paths and glob patterns, then add the matching files.
    ///
    /// The whole batch is rejected if any path cannot be opened.
    ///
    /// # Errors
    ///
    /// Returns [`PdfStitchError::FileNotFound`] for a missing path, or
    /// [`PdfStitchError::NoValidFiles`] if nothing matched was a PDF.
    pub async fn add_paths<T>(&mut self, patterns: T) -> Result<Vec<ItemId>>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        let handles = match load_handles(patterns).await {
            Ok(handles) => handles,
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                return Err(err);
            }
        };

        let batch = handles.len();
        let ids = self.add_files(handles)?;
        if ids.len() < batch {
            warn!(skipped = batch - ids.len(), "skipped non-PDF files");
        }
        Ok(ids)
    }

    /// Remove an item from the list.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let removed = self.store.remove(id);
        self.notice = removed.as_ref().map(|item| {
            debug!(name = %item.name, "removed item");
            Notice::success(format!("Removed {}", item.name))
        });
        removed
    }

    /// Move `id` to the slot held by `target`.
    pub fn move_item(&mut self, id: &ItemId, target: &ItemId) -> bool {
        self.notice = None;
        self.store.move_item(id, target)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.store.clear();
        self.notice = Some(Notice::success("List cleared"));
    }

    /// Start a merge of the current list.
    ///
    /// # Errors
    ///
    /// - [`PdfStitchError::MergeInProgress`] if a merge is running
    /// - [`PdfStitchError::TooFewItems`] with fewer than two items
    pub fn begin_merge(&mut self) -> Result<MergeJob> {
        let guard = match self.gate.try_acquire() {
            Ok(guard) => guard,
            Err(err) => {
                self.notice = Some(Notice::error(&err));
                return Err(err);
            }
        };

        if self.store.len() < MIN_MERGE_ITEMS {
            let err = PdfStitchError::TooFewItems {
                count: self.store.len(),
            };
            self.notice = Some(Notice::error(&err));
            self.last_succeeded = Some(false);
            return Err(err);
        }

        self.notice = None;
        info!(items = self.store.len(), "starting merge");

        Ok(MergeJob {
            items: self.store.snapshot(),
            executor: self.executor.clone(),
            writer: self.writer.clone(),
            _guard: guard,
        })
    }

    /// Record the outcome of a finished job and pass it through.
    pub fn complete_merge(&mut self, outcome: Result<MergeReport>) -> Result<MergeReport> {
        self.record(&outcome, |report| {
            format!(
                "Merged {} file(s) into {}",
                report.statistics.files_merged,
                report.receipt.path.display()
            )
        });
        self.last_succeeded = Some(outcome.is_ok());
        outcome
    }

    /// Start, run and complete a merge in one go.
    ///
    /// # Errors
    ///
    /// See [`Session::begin_merge`] and [`MergeJob::run`].
    pub async fn run_merge(&mut self) -> Result<MergeReport> {
        let job = self.begin_merge()?;
        let outcome = job.run().await;
        self.complete_merge(outcome)
    }

    fn record<T>(&mut self, result: &Result<T>, describe: impl FnOnce(&T) -> String) {
        self.notice = Some(match result {
            Ok(value) => Notice::success(describe(value)),
            Err(err) => {
                warn!(error = %err, "action failed");
                Notice::error(err)
            }
        });
    }
}

async fn load_handles<T>(patterns: T) -> Result<Vec<FileHandle>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut handles = Vec::new();
    for path in collect_paths_for_patterns(patterns)? {
        handles.push(FileHandle::from_path(&path).await?);
    }
    Ok(handles)
}
