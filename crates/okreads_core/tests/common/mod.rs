#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use okreads_core::{update, AppState, Book, Effect, Msg, ReadingListItem};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(okreads_logging::initialize_for_tests);
}

pub fn added_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn create_book(id: &str) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Book {id}"),
        authors: vec![format!("Author {id}")],
        description: format!("Description {id}"),
        publisher: Some("Publisher".to_string()),
        published_date: Some("2019-05-01".to_string()),
        cover_url: None,
    }
}

pub fn create_reading_list_item(id: &str) -> ReadingListItem {
    ReadingListItem::from_book(&create_book(id), added_time())
}

/// State whose reading list is loaded with `ids`, in order.
pub fn loaded_state(ids: &[&str]) -> AppState {
    let list = ids.iter().map(|id| create_reading_list_item(id)).collect();
    let (mut state, _) = update(AppState::new(), Msg::ReadingListLoaded(list));
    state.consume_dirty();
    state
}

pub fn add(state: AppState, id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::AddToReadingList {
            book: create_book(id),
            added_time: added_time(),
        },
    )
}

pub fn remove(state: AppState, id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::RemoveFromReadingList {
            book_id: id.to_string(),
        },
    )
}

pub fn ids(state: &AppState) -> Vec<String> {
    state
        .reading_list()
        .ids()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}
