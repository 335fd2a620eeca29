use std::fmt;
use std::io;
use std::path::PathBuf;

use bvget_core::{ItemOutcome, Stage, WorkItem};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
        }
    }
}

/// A resolved stream address and where its bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub url: String,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    pub item_id: String,
    pub stream: StreamKind,
    pub bytes: u64,
    /// Declared content length, if the server sent one.
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ItemStarted {
        position: usize,
        total: usize,
        item: WorkItem,
    },
    StageChanged {
        item_id: String,
        stage: Stage,
    },
    Progress(DownloadProgress),
    ItemFinished(ItemReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub item: WorkItem,
    pub outcome: ItemOutcome,
    pub failure: Option<ItemFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ItemError> for ItemFailure {
    fn from(err: &ItemError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Everything that can abort one work item.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("no play info payload found for {id}")]
    DataUnavailable { id: String },
    #[error("{id} does not offer dash streams")]
    UnsupportedFormat { id: String },
    #[error("no usable {stream} stream for {id}")]
    MissingStream { id: String, stream: StreamKind },
    #[error("transport error: {0}")]
    Transport(#[from] FetchError),
    #[error("merge failed for {id}: {reason}")]
    MergeFailure { id: String, reason: String },
    #[error("filesystem error: {0}")]
    Filesystem(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataUnavailable,
    UnsupportedFormat,
    MissingStream,
    Transport,
    MergeFailure,
    Filesystem,
}

impl ItemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ItemError::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            ItemError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ItemError::MissingStream { .. } => ErrorKind::MissingStream,
            ItemError::Transport(_) => ErrorKind::Transport,
            ItemError::MergeFailure { .. } => ErrorKind::MergeFailure,
            ItemError::Filesystem(_) => ErrorKind::Filesystem,
        }
    }
}
