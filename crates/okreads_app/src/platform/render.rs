use std::cell::RefCell;

use okreads_core::{
    format_published_date, Book, ReadingListBook, ReadingListItem, ReadingListState, SearchState,
    Store, Subscription,
};

pub fn reading_list_lines(list: &ReadingListState) -> Vec<String> {
    if let Some(error) = list.error() {
        return vec![format!("Reading list unavailable: {error}")];
    }
    if !list.loaded() {
        return Vec::new();
    }
    if list.is_empty() {
        return vec!["Your reading list is empty.".to_string()];
    }

    let mut lines = vec![format!("Reading list ({}):", list.len())];
    lines.extend(list.items().map(|item| {
        let marker = if list.pending(&item.book_id).is_some() {
            " (saving)"
        } else {
            ""
        };
        format!("  [{}] {}{}", item.book_id, describe_item(item), marker)
    }));
    lines
}

pub fn search_status_lines(search: &SearchState) -> Vec<String> {
    if search.loading() {
        return vec![format!("Searching for \"{}\"...", search.term())];
    }
    if let Some(error) = search.error() {
        return vec![format!("Search failed: {error}")];
    }
    if !search.term().is_empty() && search.results().is_empty() {
        return vec![format!("No books found for \"{}\".", search.term())];
    }
    Vec::new()
}

pub fn result_lines(rows: &[ReadingListBook]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let action = if row.is_added {
                "on your list"
            } else {
                "want to read"
            };
            format!("{:>3}. {} [{}]", index + 1, describe_book(&row.book), action)
        })
        .collect()
}

fn describe_book(book: &Book) -> String {
    describe(
        &book.title,
        &book.authors,
        book.publisher.as_deref(),
        book.published_date.as_deref(),
    )
}

fn describe_item(item: &ReadingListItem) -> String {
    describe(
        &item.title,
        &item.authors,
        item.publisher.as_deref(),
        item.published_date.as_deref(),
    )
}

fn describe(
    title: &str,
    authors: &[String],
    publisher: Option<&str>,
    published: Option<&str>,
) -> String {
    let mut text = title.to_string();
    if !authors.is_empty() {
        text.push_str(" by ");
        text.push_str(&authors.join(", "));
    }
    if let Some(publisher) = publisher {
        text.push_str(" | ");
        text.push_str(publisher);
    }
    if let Some(date) = published.and_then(format_published_date) {
        text.push_str(" | ");
        text.push_str(&date);
    }
    text
}

/// Prints each store channel to stdout whenever its rendering changes.
/// Dropping the returned subscriptions stops the output.
pub fn attach(store: &Store) -> Vec<Subscription> {
    let list_printer = Printer::default();
    let status_printer = Printer::default();
    let rows_printer = Printer::default();
    vec![
        store.subscribe_reading_list(move |list| list_printer.show(reading_list_lines(list))),
        store.subscribe_search(move |search| status_printer.show(search_status_lines(search))),
        store.subscribe_search_view(move |rows| rows_printer.show(result_lines(rows))),
    ]
}

#[derive(Default)]
struct Printer {
    last: RefCell<Vec<String>>,
}

impl Printer {
    fn show(&self, lines: Vec<String>) {
        let mut last = self.last.borrow_mut();
        if *last == lines {
            return;
        }
        for line in &lines {
            println!("{line}");
        }
        *last = lines;
    }
}
