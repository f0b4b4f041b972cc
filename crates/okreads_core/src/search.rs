use crate::Book;

/// Monotonic tag identifying a dispatched search request.
pub type Generation = u64;

/// Outcome of submitting a non-empty term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchDispatch {
    pub generation: Generation,
    /// A still-unanswered older request that this submission superseded.
    pub superseded: Option<Generation>,
}

/// Search results for the most recently issued request.
///
/// Responses are accepted only when their generation is the active one, so
/// `results` never reflects a superseded request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    term: String,
    results: Vec<Book>,
    loading: bool,
    error: Option<String>,
    active_generation: Generation,
    in_flight: Option<Generation>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn results(&self) -> &[Book] {
        &self.results
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_generation(&self) -> Generation {
        self.active_generation
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    /// Starts a new request generation for `term`. A blank term clears the
    /// search instead and returns `None`.
    pub fn submit(&mut self, term: &str) -> Option<SearchDispatch> {
        let term = term.trim();
        if term.is_empty() {
            self.clear();
            return None;
        }
        let superseded = self.in_flight.take();
        self.active_generation += 1;
        self.term = term.to_string();
        self.results.clear();
        self.error = None;
        self.loading = true;
        self.in_flight = Some(self.active_generation);
        Some(SearchDispatch {
            generation: self.active_generation,
            superseded,
        })
    }

    /// Applies a successful response. Returns false and leaves the state
    /// untouched when the response is stale.
    pub fn accept_results(&mut self, generation: Generation, books: Vec<Book>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.results = books;
        self.loading = false;
        self.in_flight = None;
        true
    }

    pub fn accept_failure(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.error = Some(message.into());
        self.results.clear();
        self.loading = false;
        self.in_flight = None;
        true
    }

    /// Resets term, results and flags and retires the active generation so any
    /// in-flight response becomes stale. Returns the generation that was in flight.
    pub fn clear(&mut self) -> Option<Generation> {
        let in_flight = self.in_flight.take();
        if in_flight.is_some() {
            self.active_generation += 1;
        }
        self.term.clear();
        self.results.clear();
        self.error = None;
        self.loading = false;
        in_flight
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.in_flight == Some(generation) && generation == self.active_generation
    }
}
