use serde::{Deserialize, Serialize};

/// Upload attempt state machine
///
/// Design principle: This is a pure type state machine with only state
/// definitions and transition validation logic. Runtime behaviors like
/// retries and timeouts are handled by the application layer (fl-app).
///
/// State transitions:
///
/// ```text
/// Pending ──→ Uploading ──→ Done
///    ↑             │
///    │             ├─→ Pending   (attempt failed, retry later)
///    │             └─→ Failed    (attempt budget exhausted)
///    │                    │
///    └────────────────────┘      (manual requeue)
/// ```
///
/// Only the drain flow advances a record out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Waiting in the queue for the next drain pass
    Pending,

    /// A drain pass is currently pushing this record to the endpoint
    Uploading,

    /// Confirmed by the remote endpoint; the record is about to be deleted
    Done,

    /// Attempt budget exhausted; kept in the store until the user
    /// requeues or cancels it
    Failed,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "uploading" => Some(Self::Uploading),
            "done" => Some(Self::Done),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Check if this is a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Check if the record is eligible for a drain pass
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    /// Start an upload attempt
    pub fn start_attempt(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Uploading),
            _ => None,
        }
    }

    /// Transition after the remote endpoint confirmed the upload
    pub fn on_uploaded(self) -> Option<Self> {
        match self {
            Self::Uploading => Some(Self::Done),
            _ => None,
        }
    }

    /// Transition after a failed attempt; dead-letters when the attempt
    /// budget is exhausted, otherwise returns the record to the queue
    pub fn on_attempt_failed(self, budget_exhausted: bool) -> Option<Self> {
        match self {
            Self::Uploading if budget_exhausted => Some(Self::Failed),
            Self::Uploading => Some(Self::Pending),
            _ => None,
        }
    }

    /// Manual requeue of a dead-lettered record
    pub fn requeue(self) -> Option<Self> {
        match self {
            Self::Failed => Some(Self::Pending),
            _ => None,
        }
    }
}

impl Default for UploadStatus {
    fn default() -> Self {
        Self::Pending
    }
}
