// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pagewerk restore pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PagewerkError;

/// MIME type of every exported page.
pub const EXPORT_MIME_TYPE: &str = "image/jpeg";

/// Unique identifier for a restore session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One qualifying page record handed over by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub source_url: String,
    /// 1-based position within the episode.
    pub index: u32,
}

/// Lifecycle states of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStatus {
    /// Still scrambled, never attempted.
    Pending,
    /// A restore attempt is in flight.
    Restoring,
    /// Descrambled bytes are available.
    Restored,
    /// The last attempt failed; see `last_error`.
    Failed,
}

impl PageStatus {
    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// `Failed -> Restoring` is the only backwards edge (manual retry).
    pub fn can_transition_to(self, next: PageStatus) -> bool {
        matches!(
            (self, next),
            (PageStatus::Pending, PageStatus::Restoring)
                | (PageStatus::Failed, PageStatus::Restoring)
                | (PageStatus::Restoring, PageStatus::Restored)
                | (PageStatus::Restoring, PageStatus::Failed)
        )
    }
}

/// Classification of errors for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Network blip or flaky host. Retrying the same page may succeed.
    Transient,
    /// Geometry or format problem. Retrying with the same profile cannot help.
    Permanent,
    /// The session went away mid-attempt.
    Cancelled,
}

/// Taxonomy tag recorded on a failed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    SourceTooSmall,
    NonIntegerTileSize,
    ImageLoad,
    ImageCodec,
    Cancelled,
    Other,
}

/// Why the last restore attempt of a page failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub kind: FailureKind,
    pub message: String,
    pub retryable: bool,
}

/// A single page of an episode and its restoration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub source_url: String,
    /// 1-based, unique and contiguous within a batch.
    pub index: u32,
    pub status: PageStatus,
    /// Present iff `status == Restored`.
    #[serde(skip)]
    pub restored_bytes: Option<Vec<u8>>,
    /// Present iff `status == Failed`.
    pub last_error: Option<PageFailure>,
    /// Number of restore attempts started so far.
    pub attempts: u32,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn new(record: PageRecord) -> Self {
        Self {
            source_url: record.source_url,
            index: record.index,
            status: PageStatus::Pending,
            restored_bytes: None,
            last_error: None,
            attempts: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn is_restored(&self) -> bool {
        self.status == PageStatus::Restored
    }
}

/// What a download sink reported for one item. Exactly one per delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
    TimedOut,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// The export error a failed or timed-out delivery stands for.
    pub fn to_error(&self) -> Option<PagewerkError> {
        match self {
            Self::Delivered => None,
            Self::Failed(reason) => Some(PagewerkError::Export(reason.clone())),
            Self::TimedOut => Some(PagewerkError::Export("sink did not answer in time".into())),
        }
    }
}

/// Result of exporting a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub index: u32,
    pub filename: String,
    pub outcome: DeliveryOutcome,
}

/// Summary of a batch restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Pages a restore was started for.
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// Pages that were already restored and left alone.
    pub skipped: u32,
    /// The session was torn down before every page was attempted.
    pub cancelled: bool,
    /// Page that was mid-restore at teardown. It ends `Failed` with kind
    /// `Cancelled` but is not counted in `failed`.
    pub interrupted: Option<u32>,
}

/// Summary of a batch export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// One entry per dispatched page, in ascending index order.
    pub items: Vec<ExportOutcome>,
    pub cancelled: bool,
}

impl ExportReport {
    pub fn delivered(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.delivered()
    }
}

/// Zero-padded export file name for `index` in an episode of `total_pages`.
///
/// One digit below 10 pages, two below 100, three otherwise.
pub fn export_file_name(index: u32, total_pages: usize) -> String {
    let width: usize = if total_pages >= 100 {
        3
    } else if total_pages >= 10 {
        2
    } else {
        1
    };
    format!("{index:0width$}.jpg")
}
