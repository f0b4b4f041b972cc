use std::sync::{mpsc, Arc};

use okreads_core::{Effect, Msg};
use okreads_engine::{BooksApi, EngineEvent, EngineHandle, EngineSettings, EventSink};
use okreads_logging::{okreads_info, okreads_warn};

use super::input::Inbound;

/// Executes effects returned by `update` on the engine and feeds the outcomes
/// back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn BooksApi>,
        settings: EngineSettings,
        inbound_tx: mpsc::Sender<Inbound>,
    ) -> Self {
        let sink = Arc::new(MsgSink { tx: inbound_tx });
        Self {
            engine: EngineHandle::new(api, settings, sink),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchReadingList => {
                    okreads_info!("FetchReadingList");
                    self.engine.load_reading_list();
                }
                Effect::CreateItem { book } => {
                    okreads_info!("CreateItem book_id={}", book.id);
                    self.engine.create_item(book);
                }
                Effect::DeleteItem { removed } => {
                    okreads_info!(
                        "DeleteItem book_id={} position={}",
                        removed.item.book_id,
                        removed.position
                    );
                    self.engine.delete_item(removed);
                }
                Effect::RunSearch { generation, term } => {
                    okreads_info!("RunSearch generation={} term={:?}", generation, term);
                    self.engine.search(generation, term);
                }
                Effect::CancelSearch { generation } => {
                    okreads_info!("CancelSearch generation={}", generation);
                    self.engine.cancel_search(generation);
                }
                Effect::ScheduleDebounce { token, delay } => {
                    self.engine.start_timer(token, delay);
                }
            }
        }
    }
}

/// Forwards engine events to the dispatch loop as messages.
struct MsgSink {
    tx: mpsc::Sender<Inbound>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Inbound::Msg(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ReadingListLoaded(Ok(list)) => Msg::ReadingListLoaded(list),
        EngineEvent::ReadingListLoaded(Err(error)) => {
            okreads_warn!("Reading list load failed ({}): {}", error.kind, error);
            Msg::ReadingListLoadFailed(error.to_string())
        }
        EngineEvent::ItemCreated { book_id, result } => match result {
            Ok(()) => Msg::AddConfirmed { book_id },
            Err(error) => {
                okreads_warn!("Create {} failed ({}): {}", book_id, error.kind, error);
                Msg::AddFailed {
                    book_id,
                    error: error.to_string(),
                }
            }
        },
        EngineEvent::ItemDeleted { removed, result } => match result {
            Ok(()) => Msg::RemoveConfirmed {
                book_id: removed.item.book_id,
            },
            Err(error) => {
                okreads_warn!(
                    "Delete {} failed ({}): {}",
                    removed.item.book_id,
                    error.kind,
                    error
                );
                Msg::RemoveFailed {
                    removed,
                    error: error.to_string(),
                }
            }
        },
        EngineEvent::SearchCompleted { generation, result } => match result {
            Ok(books) => Msg::SearchSucceeded { generation, books },
            Err(error) => {
                okreads_warn!("Search {} failed ({}): {}", generation, error.kind, error);
                Msg::SearchFailed {
                    generation,
                    error: error.to_string(),
                }
            }
        },
        EngineEvent::TimerElapsed { token } => Msg::DebounceElapsed { token },
    }
}

#[cfg(test)]
mod tests {
    use super::{map_event, MsgSink};
    use crate::platform::input::Inbound;
    use chrono::Utc;
    use okreads_core::{Book, Msg, ReadingListItem, RemovedItem};
    use okreads_engine::{ApiError, EngineEvent, EventSink, FailureKind};

    fn item(id: &str) -> ReadingListItem {
        let book = Book {
            id: id.to_string(),
            title: id.to_string(),
            authors: Vec::new(),
            description: String::new(),
            publisher: None,
            published_date: None,
            cover_url: None,
        };
        ReadingListItem::from_book(&book, Utc::now())
    }

    fn failure(message: &str) -> ApiError {
        ApiError {
            kind: FailureKind::HttpStatus(500),
            message: message.to_string(),
        }
    }

    #[test]
    fn failed_create_carries_backend_message() {
        let msg = map_event(EngineEvent::ItemCreated {
            book_id: "A".into(),
            result: Err(failure("Internal server error")),
        });

        assert_eq!(
            msg,
            Msg::AddFailed {
                book_id: "A".into(),
                error: "Internal server error".into(),
            }
        );
    }

    #[test]
    fn confirmed_delete_names_the_book() {
        let removed = RemovedItem {
            item: item("B"),
            position: 0,
        };
        let msg = map_event(EngineEvent::ItemDeleted {
            removed,
            result: Ok(()),
        });

        assert_eq!(msg, Msg::RemoveConfirmed { book_id: "B".into() });
    }

    #[test]
    fn failed_delete_returns_snapshot_for_revert() {
        let removed = RemovedItem {
            item: item("B"),
            position: 2,
        };
        let msg = map_event(EngineEvent::ItemDeleted {
            removed: removed.clone(),
            result: Err(failure("gone")),
        });

        assert_eq!(
            msg,
            Msg::RemoveFailed {
                removed,
                error: "gone".into(),
            }
        );
    }

    #[test]
    fn sink_forwards_events_as_messages() {
        let (tx, rx) = std::sync::mpsc::channel();
        let sink: Box<dyn EventSink> = Box::new(MsgSink { tx });
        sink.emit(EngineEvent::TimerElapsed { token: 3 });

        match rx.try_recv() {
            Ok(Inbound::Msg(msg)) => assert_eq!(msg, Msg::DebounceElapsed { token: 3 }),
            other => panic!("unexpected inbound {other:?}"),
        }
    }

    #[test]
    fn search_outcomes_keep_generation() {
        let msg = map_event(EngineEvent::SearchCompleted {
            generation: 4,
            result: Err(failure("boom")),
        });
        assert_eq!(
            msg,
            Msg::SearchFailed {
                generation: 4,
                error: "boom".into(),
            }
        );

        let msg = map_event(EngineEvent::TimerElapsed { token: 9 });
        assert_eq!(msg, Msg::DebounceElapsed { token: 9 });
    }
}
