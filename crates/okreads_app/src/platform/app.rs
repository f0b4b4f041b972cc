use std::ops::ControlFlow;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use chrono::Utc;
use okreads_core::{AppState, Msg, Store, UndoAction};
use okreads_engine::{BooksApi, ReqwestBooksApi};
use okreads_logging::{okreads_debug, okreads_info};

use super::config::{config_path, load_config};
use super::effects::EffectRunner;
use super::input::{spawn_reader, Command, Inbound, HELP};
use super::{logging, render};

pub fn run_app() -> anyhow::Result<()> {
    let path = config_path();
    let config = load_config(&path)?;
    if let Err(err) = logging::initialize(
        config.log_destination,
        config.log_level()?,
        &config.log_file,
    ) {
        eprintln!("Warning: logging disabled: {err}");
    }
    okreads_info!("okreads starting with config {:?}", path);

    let api = ReqwestBooksApi::new(config.api_settings())
        .with_context(|| format!("invalid api_base_url {:?}", config.api_base_url))?;
    let api: Arc<dyn BooksApi> = Arc::new(api);

    let (inbound_tx, inbound_rx) = mpsc::channel::<Inbound>();
    let runner = EffectRunner::new(api, config.engine_settings(), inbound_tx.clone());
    let mut session = Session::new(
        Store::new(AppState::with_settings(config.search_settings())),
        runner,
    );
    let _subscriptions = render::attach(session.store());

    println!("{HELP}");
    spawn_reader(inbound_tx);
    session.submit(Msg::LoadReadingList);

    while let Ok(inbound) = inbound_rx.recv() {
        if session.handle(inbound).is_break() {
            break;
        }
    }
    okreads_info!("okreads exiting");
    Ok(())
}

/// The single-threaded dispatch loop: every message goes through the store,
/// and every effect it returns goes to the runner.
struct Session {
    store: Store,
    runner: EffectRunner,
    seq: u64,
}

impl Session {
    fn new(store: Store, runner: EffectRunner) -> Self {
        Self {
            store,
            runner,
            seq: 0,
        }
    }

    fn store(&self) -> &Store {
        &self.store
    }

    fn handle(&mut self, inbound: Inbound) -> ControlFlow<()> {
        match inbound {
            Inbound::Msg(msg) => self.submit(msg),
            Inbound::Command(Command::Quit) => return ControlFlow::Break(()),
            Inbound::Command(command) => self.command(command),
        }
        ControlFlow::Continue(())
    }

    fn submit(&mut self, msg: Msg) {
        self.seq += 1;
        okreads_logging::set_dispatch_seq(self.seq);
        okreads_debug!("Dispatch {:?}", msg);
        let effects = self.store.dispatch(msg);
        self.runner.enqueue(effects);
    }

    fn command(&mut self, command: Command) {
        let msg = match command {
            Command::Type(text) => Msg::SearchTermChanged(text),
            Command::Search => Msg::SearchSubmitted,
            Command::Example => Msg::SearchExample,
            Command::Clear => Msg::ClearSearch,
            Command::Add(index) => {
                let Some(book) = self.store.state().search().results().get(index - 1) else {
                    println!("There is no result {index}.");
                    return;
                };
                if let Some(notice) = pending_notice(self.store.state(), &book.id) {
                    println!("{notice}");
                    return;
                }
                Msg::AddToReadingList {
                    book: book.clone(),
                    added_time: Utc::now(),
                }
            }
            Command::Remove(book_id) => {
                if !self.store.state().reading_list().contains(&book_id) {
                    println!("{book_id} is not on your reading list.");
                    return;
                }
                if let Some(notice) = pending_notice(self.store.state(), &book_id) {
                    println!("{notice}");
                    return;
                }
                Msg::RemoveFromReadingList { book_id }
            }
            Command::Undo => match undo_intent(self.store.state()) {
                Ok(msg) => msg,
                Err(notice) => {
                    println!("{notice}");
                    return;
                }
            },
            Command::List => {
                let lines = render::reading_list_lines(self.store.state().reading_list());
                if lines.is_empty() {
                    println!("Reading list is still loading.");
                }
                for line in lines {
                    println!("{line}");
                }
                return;
            }
            Command::Help => {
                println!("{HELP}");
                return;
            }
            Command::Quit => return,
        };
        self.submit(msg);
    }
}

/// Message that undoes the last add or remove, or the reason it cannot run yet.
fn undo_intent(state: &AppState) -> Result<Msg, String> {
    let (book_id, msg) = match state.last_undo() {
        Some(UndoAction::Add { book_id }) => (
            book_id,
            Msg::UndoAdd {
                book_id: book_id.clone(),
            },
        ),
        Some(UndoAction::Remove { removed }) => (
            &removed.item.book_id,
            Msg::UndoRemove {
                removed: removed.clone(),
            },
        ),
        None => return Err("Nothing to undo.".to_string()),
    };
    match pending_notice(state, book_id) {
        Some(notice) => Err(notice),
        None => Ok(msg),
    }
}

/// The core ignores intents for a book whose last change is still unconfirmed.
fn pending_notice(state: &AppState, book_id: &str) -> Option<String> {
    state
        .reading_list()
        .pending(book_id)
        .map(|_| format!("{book_id} is still being saved; try again in a moment."))
}
