use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable catalog key shared by books and reading-list items.
pub type BookId = String;

/// A catalog entry as returned by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

/// A book on the reading list. Display attributes are denormalized from the
/// book so the list renders without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListItem {
    pub book_id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub added_time: Option<DateTime<Utc>>,
}

impl ReadingListItem {
    pub fn from_book(book: &Book, added_time: DateTime<Utc>) -> Self {
        Self {
            book_id: book.id.clone(),
            title: book.title.clone(),
            authors: book.authors.clone(),
            description: book.description.clone(),
            publisher: book.publisher.clone(),
            published_date: book.published_date.clone(),
            cover_url: book.cover_url.clone(),
            added_time: Some(added_time),
        }
    }

    /// Rebuilds the catalog view of this item, used when an item has to be
    /// created again on the backend.
    pub fn to_book(&self) -> Book {
        Book {
            id: self.book_id.clone(),
            title: self.title.clone(),
            authors: self.authors.clone(),
            description: self.description.clone(),
            publisher: self.publisher.clone(),
            published_date: self.published_date.clone(),
            cover_url: self.cover_url.clone(),
        }
    }
}
