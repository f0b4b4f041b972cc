use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::{Book, BookId, ReadingListItem};

/// Kind of unconfirmed backend mutation for a book id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMutation {
    Add,
    Remove,
}

/// An item taken out of the list by an optimistic remove, with the number of
/// items that preceded it at removal time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedItem {
    pub item: ReadingListItem,
    pub position: usize,
}

/// Normalized, insertion-ordered reading list.
///
/// Every mutation is total: unknown ids and repeated operations are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadingListState {
    items: IndexMap<BookId, ReadingListItem>,
    loaded: bool,
    error: Option<String>,
    pending: HashMap<BookId, PendingMutation>,
}

impl ReadingListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> impl Iterator<Item = &ReadingListItem> {
        self.items.values()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }

    pub fn get(&self, book_id: &str) -> Option<&ReadingListItem> {
        self.items.get(book_id)
    }

    pub fn contains(&self, book_id: &str) -> bool {
        self.items.contains_key(book_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending(&self, book_id: &str) -> Option<PendingMutation> {
        self.pending.get(book_id).copied()
    }

    /// Replaces the whole collection. Later duplicates of a key overwrite the
    /// value but keep the first position.
    pub fn load_all(&mut self, list: Vec<ReadingListItem>) {
        self.items = list
            .into_iter()
            .map(|item| (item.book_id.clone(), item))
            .collect();
        self.loaded = true;
        self.error = None;
    }

    /// Appends an item built from `book`. Returns false if the book is already listed.
    pub fn add_optimistic(&mut self, book: &Book, added_time: DateTime<Utc>) -> bool {
        if self.items.contains_key(&book.id) {
            return false;
        }
        self.items
            .insert(book.id.clone(), ReadingListItem::from_book(book, added_time));
        true
    }

    pub fn remove_optimistic(&mut self, book_id: &str) -> Option<RemovedItem> {
        self.items
            .shift_remove_full(book_id)
            .map(|(position, _, item)| RemovedItem { item, position })
    }

    pub fn confirm_add(&mut self, book_id: &str) {
        self.settle(book_id, PendingMutation::Add);
    }

    pub fn confirm_remove(&mut self, book_id: &str) {
        self.settle(book_id, PendingMutation::Remove);
    }

    /// Undo of [`Self::add_optimistic`].
    pub fn revert_add(&mut self, book_id: &str) -> Option<ReadingListItem> {
        self.settle(book_id, PendingMutation::Add);
        self.items.shift_remove(book_id)
    }

    /// Undo of [`Self::remove_optimistic`]: re-inserts at the recorded position,
    /// clamped to the current length. Returns false if the id is already present.
    pub fn revert_remove(&mut self, removed: RemovedItem) -> bool {
        self.settle(&removed.item.book_id, PendingMutation::Remove);
        if self.items.contains_key(&removed.item.book_id) {
            return false;
        }
        let position = removed.position.min(self.items.len());
        self.items
            .shift_insert(position, removed.item.book_id.clone(), removed.item);
        true
    }

    pub fn load_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Records an in-flight backend mutation. Returns false if one is already
    /// pending for this id.
    pub(crate) fn begin_mutation(&mut self, book_id: &str, kind: PendingMutation) -> bool {
        if self.pending.contains_key(book_id) {
            return false;
        }
        self.pending.insert(book_id.to_string(), kind);
        true
    }

    fn settle(&mut self, book_id: &str, kind: PendingMutation) {
        if self.pending.get(book_id) == Some(&kind) {
            self.pending.remove(book_id);
        }
    }
}
