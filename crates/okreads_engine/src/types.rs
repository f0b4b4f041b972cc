use std::fmt;
use std::sync::mpsc;

use okreads_core::{Book, BookId, Generation, ReadingListItem, RemovedItem, TimerToken};

/// Outcome of one engine command, delivered through an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ReadingListLoaded(Result<Vec<ReadingListItem>, ApiError>),
    ItemCreated {
        book_id: BookId,
        result: Result<(), ApiError>,
    },
    ItemDeleted {
        removed: RemovedItem,
        result: Result<(), ApiError>,
    },
    SearchCompleted {
        generation: Generation,
        result: Result<Vec<Book>, ApiError>,
    },
    TimerElapsed {
        token: TimerToken,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// A failed backend call. `Display` yields the message alone, which is what
/// the core stores as its opaque error payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
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
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
        }
    }
}
