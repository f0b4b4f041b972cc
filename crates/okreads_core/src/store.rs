use okreads_logging::okreads_trace;

use crate::view_model::derive_search_view;
use crate::{
    update, AppState, Effect, Msg, Observable, ReadingListBook, ReadingListState, SearchState,
    Subscription,
};

/// Owns the application state and publishes snapshots after every message.
///
/// Only parts that changed are published; the derived search view follows
/// whenever either upstream part did.
pub struct Store {
    state: AppState,
    reading_list: Observable<ReadingListState>,
    search: Observable<SearchState>,
    search_view: Observable<Vec<ReadingListBook>>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        let reading_list = Observable::new(state.reading_list().clone());
        let search = Observable::new(state.search().clone());
        let search_view = Observable::new(derive_search_view(state.search(), state.reading_list()));
        Self {
            state,
            reading_list,
            search,
            search_view,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs `msg` through `update`, notifies subscribers, and returns the
    /// effects for the caller to execute.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;

        if dirty.reading_list {
            okreads_trace!("Publishing reading list snapshot");
            self.reading_list.publish(self.state.reading_list().clone());
        }
        if dirty.search {
            okreads_trace!("Publishing search snapshot");
            self.search.publish(self.state.search().clone());
        }
        if dirty.any() {
            self.search_view.publish(derive_search_view(
                self.state.search(),
                self.state.reading_list(),
            ));
        }
        effects
    }

    pub fn subscribe_reading_list(
        &self,
        callback: impl Fn(&ReadingListState) + 'static,
    ) -> Subscription {
        self.reading_list.subscribe(callback)
    }

    pub fn subscribe_search(&self, callback: impl Fn(&SearchState) + 'static) -> Subscription {
        self.search.subscribe(callback)
    }

    pub fn subscribe_search_view(
        &self,
        callback: impl Fn(&Vec<ReadingListBook>) + 'static,
    ) -> Subscription {
        self.search_view.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::{AppState, Book, Msg, ReadingListItem};
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn book(id: &str) -> Book {
        Book {
            id: id.to_string(),
            title: id.to_string(),
            authors: Vec::new(),
            description: String::new(),
            publisher: None,
            published_date: None,
            cover_url: None,
        }
    }

    #[test]
    fn derived_view_tracks_both_stores() {
        let mut store = Store::new(AppState::new());
        let flags = Rc::new(RefCell::new(Vec::<Vec<bool>>::new()));
        let sink = flags.clone();
        let _sub = store.subscribe_search_view(move |rows| {
            sink.borrow_mut()
                .push(rows.iter().map(|row| row.is_added).collect());
        });

        store.dispatch(Msg::SearchExample);
        let generation = store.state().search().active_generation();
        store.dispatch(Msg::SearchSucceeded {
            generation,
            books: vec![book("A"), book("B")],
        });
        store.dispatch(Msg::AddToReadingList {
            book: book("B"),
            added_time: Utc::now(),
        });

        assert_eq!(
            *flags.borrow(),
            vec![vec![], vec![], vec![false, false], vec![false, true]]
        );
    }

    #[test]
    fn unchanged_store_does_not_publish() {
        let mut store = Store::new(AppState::new());
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let _sub = store.subscribe_reading_list(move |_| *sink.borrow_mut() += 1);

        store.dispatch(Msg::SearchTermChanged("java".into()));
        store.dispatch(Msg::SearchFailed {
            generation: 42,
            error: "late".into(),
        });
        assert_eq!(*count.borrow(), 1);

        store.dispatch(Msg::ReadingListLoaded(vec![ReadingListItem::from_book(
            &book("A"),
            Utc::now(),
        )]));
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn unsubscribed_callback_is_not_called() {
        let mut store = Store::new(AppState::new());
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let sub = store.subscribe_search(move |_| *sink.borrow_mut() += 1);
        sub.unsubscribe();

        store.dispatch(Msg::SearchExample);
        assert_eq!(*count.borrow(), 1);
    }
}
