//! Per-item outcomes and the aggregate batch report.

use std::fmt;
use std::path::PathBuf;

use crate::downloader::DownloadError;
use crate::fetch::FetchError;
use crate::resolver::ResolveError;
use crate::url_model::InvalidUrl;

/// Why a single URL's pipeline failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidUrl(#[from] InvalidUrl),
    #[error("{} is already the output file of {other}", path.display())]
    FilenameCollision { path: PathBuf, other: String },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl PipelineError {
    /// Fatal errors stop the batch: pending items are cancelled.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::InvalidUrl(_) | PipelineError::Fetch(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Output file exists from an earlier run.
    AlreadyExists,
    /// Same URL appeared earlier in this batch.
    DuplicateInput,
}

#[derive(Debug)]
pub enum ItemOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    Skipped { path: PathBuf, reason: SkipReason },
    Failed(PipelineError),
    /// Never started because a fatal error aborted the batch.
    Cancelled,
}

impl ItemOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ItemOutcome::Downloaded { .. } | ItemOutcome::Skipped { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ItemOutcome::Failed(e) if e.is_fatal())
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Downloaded { path, bytes } => {
                write!(f, "downloaded {} ({} bytes)", path.display(), bytes)
            }
            ItemOutcome::Skipped {
                path,
                reason: SkipReason::AlreadyExists,
            } => write!(f, "{} already exists, skipping", path.display()),
            ItemOutcome::Skipped {
                path,
                reason: SkipReason::DuplicateInput,
            } => write!(f, "duplicate input for {}, skipping", path.display()),
            ItemOutcome::Failed(e) => write!(f, "failed: {}", e),
            ItemOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug)]
pub struct ItemReport {
    /// Position of the URL in the input list.
    pub index: usize,
    pub url: String,
    pub outcome: ItemOutcome,
}

/// Outcomes for every input URL, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
    /// True if a fatal error stopped the batch early.
    pub aborted: bool,
}

impl BatchReport {
    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Downloaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed(_)))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Cancelled))
    }

    /// True when every item was downloaded or skipped.
    pub fn is_success(&self) -> bool {
        self.items.iter().all(|i| i.outcome.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| !i.outcome.is_ok())
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped, {} failed, {} cancelled",
            self.downloaded(),
            self.skipped(),
            self.failed(),
            self.cancelled()
        )
    }
}
