use std::time::Duration;

/// Identifies one scheduled debounce timer. Only the newest token can fire.
pub type TimerToken = u64;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Timer state machine for keystroke-driven search.
///
/// Each input restarts the window; a timer firing with an older token is
/// ignored. When the newest timer fires the pending term is released unless
/// it equals the last released term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    last_token: TimerToken,
    pending: Option<(TimerToken, String)>,
    last_dispatched: Option<String>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_token: 0,
            pending: None,
            last_dispatched: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a new input value and returns the timer to schedule.
    pub fn input(&mut self, term: impl Into<String>) -> (TimerToken, Duration) {
        self.last_token += 1;
        self.pending = Some((self.last_token, term.into()));
        (self.last_token, self.delay)
    }

    /// Handles a timer firing. Returns the term to dispatch, if any.
    pub fn elapsed(&mut self, token: TimerToken) -> Option<String> {
        match &self.pending {
            Some((pending_token, _)) if *pending_token == token => {}
            _ => return None,
        }
        let (_, term) = self.pending.take()?;
        let term = term.trim().to_string();
        if self.last_dispatched.as_deref() == Some(term.as_str()) {
            return None;
        }
        self.last_dispatched = Some(term.clone());
        Some(term)
    }

    /// Records a term dispatched outside the timer path, such as an explicit
    /// submit, so the next released term is compared against it.
    pub fn dispatched(&mut self, term: &str) {
        self.last_dispatched = Some(term.trim().to_string());
    }

    /// Drops the pending input so its timer fires into nothing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancels and forgets the last released term, so the same term typed
    /// again is dispatched.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_dispatched = None;
    }
}
