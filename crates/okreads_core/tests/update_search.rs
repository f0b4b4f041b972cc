mod common;

use std::time::Duration;

use common::{add, create_book, init_logging, loaded_state};
use okreads_core::{
    derive_search_view, update, AppState, Effect, Msg, SearchSettings, TimerToken,
};
use pretty_assertions::assert_eq;

fn type_term(state: AppState, term: &str) -> (AppState, TimerToken) {
    let (state, effects) = update(state, Msg::SearchTermChanged(term.to_string()));
    match effects.as_slice() {
        [Effect::ScheduleDebounce { token, delay }] => {
            assert_eq!(*delay, Duration::from_millis(500));
            (state, *token)
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

fn run_searches(effects: &[Effect]) -> Vec<(u64, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::RunSearch { generation, term } => Some((*generation, term.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn keystrokes_inside_window_dispatch_only_latest_term() {
    init_logging();
    let mut state = AppState::new();
    let mut tokens = Vec::new();
    for term in ["j", "ja", "jav", "java"] {
        let (next, token) = type_term(state, term);
        state = next;
        tokens.push(token);
    }

    // Every timer fires eventually; only the newest releases a call.
    let mut dispatched = Vec::new();
    for token in tokens {
        let (next, effects) = update(state, Msg::DebounceElapsed { token });
        state = next;
        dispatched.extend(run_searches(&effects));
    }

    assert_eq!(dispatched, vec![(1, "java".to_string())]);
    assert!(state.search().loading());
    assert_eq!(state.search().term(), "java");
}

#[test]
fn term_replaced_inside_window_searches_replacement() {
    init_logging();
    let (state, first) = type_term(AppState::new(), "java");
    let (state, second) = type_term(state, "javascript");

    let (state, effects) = update(state, Msg::DebounceElapsed { token: first });
    assert!(effects.is_empty());
    let (_state, effects) = update(state, Msg::DebounceElapsed { token: second });

    assert_eq!(run_searches(&effects), vec![(1, "javascript".to_string())]);
}

#[test]
fn identical_term_after_window_is_not_redispatched() {
    init_logging();
    let (state, token) = type_term(AppState::new(), "java");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });
    assert_eq!(effects.len(), 1);

    // User types a character and deletes it again within the window.
    let (state, _) = type_term(state, "javas");
    let (state, token) = type_term(state, "java");
    let (_state, effects) = update(state, Msg::DebounceElapsed { token });
    assert!(effects.is_empty());
}

#[test]
fn configured_debounce_is_used() {
    init_logging();
    let state = AppState::with_settings(SearchSettings {
        debounce: Duration::from_millis(120),
    });
    let (_state, effects) = update(state, Msg::SearchTermChanged("rust".into()));
    assert_eq!(
        effects,
        vec![Effect::ScheduleDebounce {
            token: 1,
            delay: Duration::from_millis(120)
        }]
    );
}

#[test]
fn late_response_for_superseded_generation_is_discarded() {
    init_logging();
    let (state, token) = type_term(AppState::new(), "java");
    let (state, _) = update(state, Msg::DebounceElapsed { token });
    let (state, token) = type_term(state, "javascript");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });
    assert_eq!(
        effects,
        vec![
            Effect::CancelSearch { generation: 1 },
            Effect::RunSearch {
                generation: 2,
                term: "javascript".into()
            },
        ]
    );

    let (state, _) = update(
        state,
        Msg::SearchSucceeded {
            generation: 2,
            books: vec![create_book("new")],
        },
    );
    let (mut state, _) = update(
        state,
        Msg::SearchSucceeded {
            generation: 1,
            books: vec![create_book("old")],
        },
    );

    assert_eq!(state.search().results(), &[create_book("new")]);
    assert!(!state.search().loading());
    assert!(state.consume_dirty().search);
}

#[test]
fn stale_response_before_current_leaves_loading() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SearchExample);
    let (state, _) = update(state, Msg::SearchTermChanged("rust".into()));
    let (mut state, _) = update(state, Msg::SearchSubmitted);
    state.consume_dirty();
    let (mut state, _) = update(
        state,
        Msg::SearchFailed {
            generation: 1,
            error: "late".into(),
        },
    );

    assert!(state.search().loading());
    assert_eq!(state.search().error(), None);
    assert!(!state.consume_dirty().search);
}

#[test]
fn backend_error_is_shown_and_results_emptied() {
    init_logging();
    let (state, token) = type_term(AppState::new(), "java1234script");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });
    let generation = run_searches(&effects)[0].0;

    let (state, _) = update(
        state,
        Msg::SearchFailed {
            generation,
            error: "Internal server error".into(),
        },
    );

    assert_eq!(state.search().error(), Some("Internal server error"));
    assert!(state.search().results().is_empty());
    assert!(!state.search().loading());
}

#[test]
fn new_submission_clears_previous_error() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SearchExample);
    let (state, _) = update(
        state,
        Msg::SearchFailed {
            generation: 1,
            error: "Internal server error".into(),
        },
    );
    let (state, _) = update(state, Msg::SearchSubmitted);

    assert_eq!(state.search().error(), None);
    assert!(state.search().loading());
}

#[test]
fn submit_sends_input_immediately_and_cancels_pending_timer() {
    init_logging();
    let (state, token) = type_term(AppState::new(), "rust");
    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert_eq!(run_searches(&effects), vec![(1, "rust".to_string())]);

    let (_state, effects) = update(state, Msg::DebounceElapsed { token });
    assert!(effects.is_empty());
}

#[test]
fn explicit_submit_repeats_identical_term() {
    init_logging();
    let (state, _) = type_term(AppState::new(), "rust");
    let (state, first) = update(state, Msg::SearchSubmitted);
    let (_state, second) = update(state, Msg::SearchSubmitted);

    assert_eq!(run_searches(&first), vec![(1, "rust".to_string())]);
    assert_eq!(run_searches(&second), vec![(2, "rust".to_string())]);
}

#[test]
fn typing_back_to_earlier_term_after_explicit_submit_searches_it() {
    init_logging();
    let (state, token) = type_term(AppState::new(), "java");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });
    assert_eq!(run_searches(&effects), vec![(1, "java".to_string())]);

    let (state, _) = type_term(state, "rust");
    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert_eq!(run_searches(&effects), vec![(2, "rust".to_string())]);

    let (state, token) = type_term(state, "java");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });
    assert_eq!(run_searches(&effects), vec![(3, "java".to_string())]);
    assert_eq!(state.search().term(), state.input());
}

#[test]
fn typing_submitted_term_again_is_not_redispatched() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SearchExample);
    let (state, token) = type_term(state, "javascript");
    let (_state, effects) = update(state, Msg::DebounceElapsed { token });
    assert!(effects.is_empty());
}

#[test]
fn blank_term_forgets_last_dispatched_term() {
    init_logging();
    let (state, token) = type_term(AppState::new(), "java");
    let (state, _) = update(state, Msg::DebounceElapsed { token });
    let (state, token) = type_term(state, "");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });
    assert!(run_searches(&effects).is_empty());

    let (state, token) = type_term(state, "java");
    let (_state, effects) = update(state, Msg::DebounceElapsed { token });
    let terms: Vec<_> = run_searches(&effects).into_iter().map(|(_, term)| term).collect();
    assert_eq!(terms, vec!["java".to_string()]);
}

#[test]
fn example_link_searches_javascript() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SearchExample);

    assert_eq!(state.input(), "javascript");
    assert_eq!(
        effects,
        vec![Effect::RunSearch {
            generation: 1,
            term: "javascript".into()
        }]
    );
}

#[test]
fn empty_submit_clears_without_backend_call() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SearchExample);
    let (state, _) = update(
        state,
        Msg::SearchSucceeded {
            generation: 1,
            books: vec![create_book("A")],
        },
    );
    let (state, token) = type_term(state, "   ");
    let (state, effects) = update(state, Msg::DebounceElapsed { token });

    assert!(run_searches(&effects).is_empty());
    assert!(state.search().results().is_empty());
    assert_eq!(state.search().error(), None);
    assert!(!state.search().loading());
}

#[test]
fn clear_search_cancels_in_flight_and_discards_its_response() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SearchExample);
    let (state, effects) = update(state, Msg::ClearSearch);
    assert_eq!(effects, vec![Effect::CancelSearch { generation: 1 }]);

    let (state, _) = update(
        state,
        Msg::SearchSucceeded {
            generation: 1,
            books: vec![create_book("A")],
        },
    );
    assert!(state.search().results().is_empty());
    assert_eq!(state.input(), "");

    // The same term typed again after a clear is searched again.
    let (state, token) = type_term(state, "javascript");
    let (_state, effects) = update(state, Msg::DebounceElapsed { token });
    assert_eq!(run_searches(&effects).len(), 1);
}

#[test]
fn derived_view_marks_books_on_reading_list() {
    init_logging();
    let (state, _) = update(loaded_state(&["B"]), Msg::SearchExample);
    let (state, _) = update(
        state,
        Msg::SearchSucceeded {
            generation: 1,
            books: vec![create_book("A"), create_book("B"), create_book("C")],
        },
    );

    let flags = |state: &AppState| -> Vec<(String, bool)> {
        derive_search_view(state.search(), state.reading_list())
            .into_iter()
            .map(|row| (row.book.id, row.is_added))
            .collect()
    };
    assert_eq!(
        flags(&state),
        vec![
            ("A".to_string(), false),
            ("B".to_string(), true),
            ("C".to_string(), false)
        ]
    );

    let (state, _) = add(state, "C");
    assert_eq!(
        flags(&state),
        vec![
            ("A".to_string(), false),
            ("B".to_string(), true),
            ("C".to_string(), true)
        ]
    );
}
