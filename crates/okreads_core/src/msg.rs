use chrono::{DateTime, Utc};

use crate::{Book, BookId, Generation, ReadingListItem, RemovedItem, TimerToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Presentation asked for the reading list to be fetched.
    LoadReadingList,
    /// Backend returned the full reading list.
    ReadingListLoaded(Vec<ReadingListItem>),
    /// Backend failed to return the reading list.
    ReadingListLoadFailed(String),
    /// User clicked "Want to read" on a search result.
    AddToReadingList {
        book: Book,
        added_time: DateTime<Utc>,
    },
    /// Backend created the item.
    AddConfirmed { book_id: BookId },
    /// Backend rejected the create; the optimistic add is reverted.
    AddFailed { book_id: BookId, error: String },
    /// User removed an item from the reading list.
    RemoveFromReadingList { book_id: BookId },
    /// Backend deleted the item.
    RemoveConfirmed { book_id: BookId },
    /// Backend rejected the delete; the item goes back to its old position.
    RemoveFailed { removed: RemovedItem, error: String },
    /// User chose "Undo" right after adding a book.
    UndoAdd { book_id: BookId },
    /// User chose "Undo" right after removing a book.
    UndoRemove { removed: RemovedItem },
    /// User edited the search box (keystroke path, debounced).
    SearchTermChanged(String),
    /// A debounce timer scheduled by the core fired.
    DebounceElapsed { token: TimerToken },
    /// User submitted the search form.
    SearchSubmitted,
    /// User clicked the example search link.
    SearchExample,
    /// User cleared the search.
    ClearSearch,
    /// Backend answered search request `generation`.
    SearchSucceeded {
        generation: Generation,
        books: Vec<Book>,
    },
    /// Search request `generation` failed.
    SearchFailed {
        generation: Generation,
        error: String,
    },
}
