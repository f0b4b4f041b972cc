//! Okreads engine: backend calls and effect execution.
mod api;
mod engine;
mod types;

pub use api::{ApiSettings, BooksApi, ReqwestBooksApi};
pub use engine::{EngineHandle, EngineSettings};
pub use types::{ApiError, ChannelEventSink, EngineEvent, EventSink, FailureKind};
