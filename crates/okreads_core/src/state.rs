use std::time::Duration;

use crate::{BookId, Debouncer, ReadingListState, RemovedItem, SearchState, DEFAULT_DEBOUNCE};

/// Term submitted by the "try searching for" example link.
pub const EXAMPLE_SEARCH_TERM: &str = "javascript";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// The most recent reading-list change the user may still undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    Add { book_id: BookId },
    Remove { removed: RemovedItem },
}

/// Which observable parts changed since the last [`AppState::consume_dirty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub reading_list: bool,
    pub search: bool,
}

impl DirtyFlags {
    pub fn any(self) -> bool {
        self.reading_list || self.search
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    reading_list: ReadingListState,
    search: SearchState,
    debouncer: Debouncer,
    input: String,
    last_undo: Option<UndoAction>,
    dirty: DirtyFlags,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            debouncer: Debouncer::new(settings.debounce),
            ..Self::default()
        }
    }

    pub fn reading_list(&self) -> &ReadingListState {
        &self.reading_list
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Current text of the search box, which may not have been submitted yet.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn last_undo(&self) -> Option<&UndoAction> {
        self.last_undo.as_ref()
    }

    /// Returns and resets the dirty flags.
    pub fn consume_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn reading_list_mut(&mut self) -> &mut ReadingListState {
        self.dirty.reading_list = true;
        &mut self.reading_list
    }

    /// Access without marking dirty, for bookkeeping that is not observable.
    pub(crate) fn reading_list_quiet(&mut self) -> &mut ReadingListState {
        &mut self.reading_list
    }

    pub(crate) fn search_mut(&mut self) -> &mut SearchState {
        self.dirty.search = true;
        &mut self.search
    }

    pub(crate) fn search_quiet(&mut self) -> &mut SearchState {
        &mut self.search
    }

    pub(crate) fn mark_search_dirty(&mut self) {
        self.dirty.search = true;
    }

    pub(crate) fn debouncer_mut(&mut self) -> &mut Debouncer {
        &mut self.debouncer
    }

    pub(crate) fn set_input(&mut self, input: String) {
        self.input = input;
    }

    pub(crate) fn set_last_undo(&mut self, undo: Option<UndoAction>) {
        self.last_undo = undo;
    }
}
