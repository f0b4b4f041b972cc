use std::future::Future;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use okreads_core::{Book, Generation, RemovedItem, TimerToken};
use okreads_logging::{okreads_debug, okreads_error, okreads_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{ApiError, BooksApi, EngineEvent, EventSink, FailureKind};

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Upper bound for any single backend call; expiry is reported as a
    /// `FailureKind::Timeout` failure.
    pub call_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
        }
    }
}

enum EngineCommand {
    LoadReadingList,
    CreateItem { book: Book },
    DeleteItem { removed: RemovedItem },
    Search { generation: Generation, term: String },
    CancelSearch { generation: Generation },
    StartTimer { token: TimerToken, delay: Duration },
}

/// Runs backend calls and timers on a dedicated tokio runtime. Every command
/// produces exactly one event, except a search cancelled before it finishes.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn BooksApi>, settings: EngineSettings, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    okreads_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut dispatcher = Dispatcher {
                runtime: runtime.handle().clone(),
                api,
                settings,
                sink,
                search: None,
                timer: None,
            };
            while let Ok(command) = cmd_rx.recv() {
                dispatcher.handle(command);
            }
        });

        Self { cmd_tx }
    }

    pub fn load_reading_list(&self) {
        self.send(EngineCommand::LoadReadingList);
    }

    pub fn create_item(&self, book: Book) {
        self.send(EngineCommand::CreateItem { book });
    }

    pub fn delete_item(&self, removed: RemovedItem) {
        self.send(EngineCommand::DeleteItem { removed });
    }

    pub fn search(&self, generation: Generation, term: impl Into<String>) {
        self.send(EngineCommand::Search {
            generation,
            term: term.into(),
        });
    }

    pub fn cancel_search(&self, generation: Generation) {
        self.send(EngineCommand::CancelSearch { generation });
    }

    pub fn start_timer(&self, token: TimerToken, delay: Duration) {
        self.send(EngineCommand::StartTimer { token, delay });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            okreads_error!("Engine thread is gone; command dropped");
        }
    }
}

/// Command-loop state. Lives on the engine thread only.
struct Dispatcher {
    runtime: Handle,
    api: Arc<dyn BooksApi>,
    settings: EngineSettings,
    sink: Arc<dyn EventSink>,
    search: Option<(Generation, CancellationToken)>,
    timer: Option<JoinHandle<()>>,
}

impl Dispatcher {
    fn handle(&mut self, command: EngineCommand) {
        let api = self.api.clone();
        let sink = self.sink.clone();
        let limit = self.settings.call_timeout;
        match command {
            EngineCommand::LoadReadingList => {
                self.runtime.spawn(async move {
                    let result = bounded(limit, api.fetch_reading_list()).await;
                    sink.emit(EngineEvent::ReadingListLoaded(result));
                });
            }
            EngineCommand::CreateItem { book } => {
                self.runtime.spawn(async move {
                    let result = bounded(limit, api.create_reading_list_item(&book)).await;
                    sink.emit(EngineEvent::ItemCreated {
                        book_id: book.id,
                        result,
                    });
                });
            }
            EngineCommand::DeleteItem { removed } => {
                self.runtime.spawn(async move {
                    let result =
                        bounded(limit, api.delete_reading_list_item(&removed.item.book_id)).await;
                    sink.emit(EngineEvent::ItemDeleted { removed, result });
                });
            }
            EngineCommand::Search { generation, term } => {
                let cancel = CancellationToken::new();
                if let Some((previous, token)) = self.search.replace((generation, cancel.clone())) {
                    // Normally cancelled already by an explicit CancelSearch.
                    if previous != generation {
                        token.cancel();
                    }
                }
                self.runtime.spawn(async move {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => {
                            okreads_debug!("Search generation {} aborted", generation);
                            return;
                        }
                        result = bounded(limit, api.search_catalog(&term)) => result,
                    };
                    sink.emit(EngineEvent::SearchCompleted { generation, result });
                });
            }
            EngineCommand::CancelSearch { generation } => match &self.search {
                Some((active, token)) if *active == generation => {
                    token.cancel();
                    self.search = None;
                }
                _ => okreads_debug!("No running search for generation {}", generation),
            },
            EngineCommand::StartTimer { token, delay } => {
                if let Some(previous) = self.timer.take() {
                    previous.abort();
                }
                self.timer = Some(self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    sink.emit(EngineEvent::TimerElapsed { token });
                }));
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            okreads_warn!("Backend call exceeded {:?}", limit);
            Err(ApiError::new(
                FailureKind::Timeout,
                format!("no response within {} ms", limit.as_millis()),
            ))
        }
    }
}
