use std::time::Duration;

use crate::{Book, Generation, RemovedItem, TimerToken};

/// Outbound work requested by `update`. Each variant maps to exactly one
/// async call whose outcome comes back as a `Msg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchReadingList,
    CreateItem { book: Book },
    DeleteItem { removed: RemovedItem },
    RunSearch { generation: Generation, term: String },
    CancelSearch { generation: Generation },
    ScheduleDebounce { token: TimerToken, delay: Duration },
}
