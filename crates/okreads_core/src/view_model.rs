use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate};

use crate::{Book, ReadingListState, SearchState};

/// A search result joined against the reading list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingListBook {
    pub book: Book,
    pub is_added: bool,
}

/// Flags every search result that is already on the reading list, keeping
/// backend order.
pub fn derive_search_view(
    search: &SearchState,
    reading_list: &ReadingListState,
) -> Vec<ReadingListBook> {
    let added: HashSet<&str> = reading_list.ids().into_iter().collect();
    search
        .results()
        .iter()
        .map(|book| ReadingListBook {
            book: book.clone(),
            is_added: added.contains(book.id.as_str()),
        })
        .collect()
}

/// Renders a catalog date as `M/D/YYYY`. Accepts full RFC 3339 timestamps and
/// the partial dates catalogs return (`YYYY-MM-DD`, `YYYY-MM`, `YYYY`).
pub fn format_published_date(date: &str) -> Option<String> {
    let date = date.trim();
    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{date}-01-01"), "%Y-%m-%d").ok())?;
    Some(format!(
        "{}/{}/{}",
        parsed.month(),
        parsed.day(),
        parsed.year()
    ))
}
