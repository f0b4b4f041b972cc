//! Okreads core: pure reading-list and search state machine, plus the
//! observable store the presentation layer subscribes to.
mod debounce;
mod effect;
mod model;
mod msg;
mod observe;
mod reading_list;
mod search;
mod state;
mod store;
mod update;
mod view_model;

pub use debounce::{Debouncer, TimerToken, DEFAULT_DEBOUNCE};
pub use effect::Effect;
pub use model::{Book, BookId, ReadingListItem};
pub use msg::Msg;
pub use observe::{Observable, Subscription};
pub use reading_list::{PendingMutation, ReadingListState, RemovedItem};
pub use search::{Generation, SearchDispatch, SearchState};
pub use state::{AppState, DirtyFlags, SearchSettings, UndoAction, EXAMPLE_SEARCH_TERM};
pub use store::Store;
pub use update::update;
pub use view_model::{derive_search_view, format_published_date, ReadingListBook};
