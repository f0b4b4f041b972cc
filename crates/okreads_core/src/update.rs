use okreads_logging::{okreads_debug, okreads_info, okreads_warn};

use crate::state::EXAMPLE_SEARCH_TERM;
use crate::{AppState, Effect, Msg, PendingMutation, RemovedItem, UndoAction};

/// Pure update function: applies a message to state and returns any effects.
///
/// Intents change state synchronously (optimistically) and request one
/// backend call each; outcomes confirm or revert what the intent did.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadReadingList => vec![Effect::FetchReadingList],
        Msg::ReadingListLoaded(list) => {
            okreads_debug!("Reading list loaded: {} items", list.len());
            state.reading_list_mut().load_all(list);
            Vec::new()
        }
        Msg::ReadingListLoadFailed(error) => {
            okreads_warn!("Reading list load failed: {}", error);
            state.reading_list_mut().load_error(error);
            Vec::new()
        }
        Msg::AddToReadingList { book, added_time } => {
            if let Some(pending) = state.reading_list().pending(&book.id) {
                okreads_warn!("Add of {} ignored: {:?} still in flight", book.id, pending);
                return (state, Vec::new());
            }
            if state.reading_list().contains(&book.id) {
                okreads_debug!("Add of {} ignored: already on the reading list", book.id);
                return (state, Vec::new());
            }
            let reading_list = state.reading_list_mut();
            reading_list.add_optimistic(&book, added_time);
            reading_list.begin_mutation(&book.id, PendingMutation::Add);
            state.set_last_undo(Some(UndoAction::Add {
                book_id: book.id.clone(),
            }));
            vec![Effect::CreateItem { book }]
        }
        Msg::AddConfirmed { book_id } => {
            if state.reading_list().pending(&book_id) == Some(PendingMutation::Add) {
                okreads_info!("confirmAdd {}", book_id);
            } else {
                okreads_debug!("confirmAdd {} without pending add", book_id);
            }
            state.reading_list_quiet().confirm_add(&book_id);
            Vec::new()
        }
        Msg::AddFailed { book_id, error } => {
            if state.reading_list().pending(&book_id) != Some(PendingMutation::Add) {
                okreads_debug!("Ignoring add failure for {} without pending add", book_id);
                return (state, Vec::new());
            }
            okreads_warn!("revertAdd {}: {}", book_id, error);
            state.reading_list_mut().revert_add(&book_id);
            forget_undo(&mut state, &book_id);
            Vec::new()
        }
        Msg::RemoveFromReadingList { book_id } => remove_intent(&mut state, &book_id, true),
        Msg::RemoveConfirmed { book_id } => {
            if state.reading_list().pending(&book_id) == Some(PendingMutation::Remove) {
                okreads_info!("confirmRemove {}", book_id);
            } else {
                okreads_debug!("confirmRemove {} without pending remove", book_id);
            }
            state.reading_list_quiet().confirm_remove(&book_id);
            Vec::new()
        }
        Msg::RemoveFailed { removed, error } => {
            let book_id = removed.item.book_id.clone();
            if state.reading_list().pending(&book_id) != Some(PendingMutation::Remove) {
                okreads_debug!("Ignoring remove failure for {} without pending remove", book_id);
                return (state, Vec::new());
            }
            okreads_warn!(
                "revertRemove {} at position {}: {}",
                book_id,
                removed.position,
                error
            );
            state.reading_list_mut().revert_remove(removed);
            forget_undo(&mut state, &book_id);
            Vec::new()
        }
        Msg::UndoAdd { book_id } => remove_intent(&mut state, &book_id, false),
        Msg::UndoRemove { removed } => undo_remove(&mut state, removed),
        Msg::SearchTermChanged(term) => {
            let (token, delay) = state.debouncer_mut().input(term.clone());
            state.set_input(term);
            vec![Effect::ScheduleDebounce { token, delay }]
        }
        Msg::DebounceElapsed { token } => match state.debouncer_mut().elapsed(token) {
            Some(term) => submit_term(&mut state, &term),
            None => Vec::new(),
        },
        Msg::SearchSubmitted => {
            state.debouncer_mut().cancel();
            let term = state.input().to_string();
            submit_term(&mut state, &term)
        }
        Msg::SearchExample => {
            state.debouncer_mut().cancel();
            state.set_input(EXAMPLE_SEARCH_TERM.to_string());
            submit_term(&mut state, EXAMPLE_SEARCH_TERM)
        }
        Msg::ClearSearch => {
            state.set_input(String::new());
            state.debouncer_mut().reset();
            clear_search(&mut state)
        }
        Msg::SearchSucceeded { generation, books } => {
            let count = books.len();
            if state.search_quiet().accept_results(generation, books) {
                state.mark_search_dirty();
                okreads_debug!("Search generation {} returned {} books", generation, count);
            } else {
                okreads_debug!("Discarding stale search response for generation {}", generation);
            }
            Vec::new()
        }
        Msg::SearchFailed { generation, error } => {
            if state.search_quiet().accept_failure(generation, error.clone()) {
                state.mark_search_dirty();
                okreads_warn!("Search generation {} failed: {}", generation, error);
            } else {
                okreads_debug!("Discarding stale search failure for generation {}", generation);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn remove_intent(state: &mut AppState, book_id: &str, remember_undo: bool) -> Vec<Effect> {
    if let Some(pending) = state.reading_list().pending(book_id) {
        okreads_warn!("Remove of {} ignored: {:?} still in flight", book_id, pending);
        return Vec::new();
    }
    if !state.reading_list().contains(book_id) {
        okreads_debug!("Remove of {} ignored: not on the reading list", book_id);
        return Vec::new();
    }
    let reading_list = state.reading_list_mut();
    let Some(removed) = reading_list.remove_optimistic(book_id) else {
        return Vec::new();
    };
    reading_list.begin_mutation(book_id, PendingMutation::Remove);
    let undo = remember_undo.then(|| UndoAction::Remove {
        removed: removed.clone(),
    });
    state.set_last_undo(undo);
    vec![Effect::DeleteItem { removed }]
}

fn undo_remove(state: &mut AppState, removed: RemovedItem) -> Vec<Effect> {
    let book_id = removed.item.book_id.clone();
    if let Some(pending) = state.reading_list().pending(&book_id) {
        okreads_warn!("Undo of remove {} ignored: {:?} still in flight", book_id, pending);
        return Vec::new();
    }
    let book = removed.item.to_book();
    let reading_list = state.reading_list_mut();
    if !reading_list.revert_remove(removed) {
        okreads_debug!("Undo of remove {} ignored: already on the reading list", book_id);
        return Vec::new();
    }
    reading_list.begin_mutation(&book_id, PendingMutation::Add);
    state.set_last_undo(None);
    vec![Effect::CreateItem { book }]
}

fn forget_undo(state: &mut AppState, book_id: &str) {
    let matches = match state.last_undo() {
        Some(UndoAction::Add { book_id: id }) => id == book_id,
        Some(UndoAction::Remove { removed }) => removed.item.book_id == book_id,
        None => false,
    };
    if matches {
        state.set_last_undo(None);
    }
}

fn submit_term(state: &mut AppState, term: &str) -> Vec<Effect> {
    if term.trim().is_empty() {
        state.debouncer_mut().reset();
        return clear_search(state);
    }
    let Some(dispatch) = state.search_mut().submit(term) else {
        return Vec::new();
    };
    let submitted = state.search().term().to_string();
    state.debouncer_mut().dispatched(&submitted);
    okreads_debug!(
        "Dispatching search generation {} for {:?}",
        dispatch.generation,
        state.search().term()
    );
    let mut effects = Vec::with_capacity(2);
    if let Some(generation) = dispatch.superseded {
        effects.push(Effect::CancelSearch { generation });
    }
    effects.push(Effect::RunSearch {
        generation: dispatch.generation,
        term: state.search().term().to_string(),
    });
    effects
}

fn clear_search(state: &mut AppState) -> Vec<Effect> {
    match state.search_mut().clear() {
        Some(generation) => vec![Effect::CancelSearch { generation }],
        None => Vec::new(),
    }
}
