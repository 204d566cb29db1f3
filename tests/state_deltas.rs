use serde_json::json;

use ufc_terminal::state::{apply_delta, AppState, Delta, Tab};

#[test]
fn payload_delta_populates_cache_and_clears_error() {
    let mut state = AppState::new();
    state.error = Some("/overview fetch failed: http 500".to_string());
    state.loading = true;

    apply_delta(
        &mut state,
        Delta::TabPayload {
            tab: Tab::Overview,
            payload: json!({"database_stats": {"total_fighters": 5}}),
        },
    );

    assert!(state.error.is_none());
    assert!(!state.loading);
    assert!(state.payload(Tab::Overview).is_some());
}

#[test]
fn error_delta_names_endpoint_and_leaves_slot_absent() {
    let mut state = AppState::new();
    let _ = state.select_tab(Tab::Events);

    apply_delta(
        &mut state,
        Delta::TabError {
            tab: Tab::Events,
            endpoint: "/events/analysis".to_string(),
            message: "request failed".to_string(),
        },
    );

    assert!(state.payload(Tab::Events).is_none());
    assert!(!state.loading);
    let error = state.error.as_deref().expect("error banner set");
    assert!(error.contains("/events/analysis"));

    // A slot left absent means the next visit retries.
    assert!(state.select_tab(Tab::Events).is_some());
}

#[test]
fn success_after_failure_clears_the_banner() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::TabError {
            tab: Tab::Events,
            endpoint: "/events/analysis".to_string(),
            message: "http 502".to_string(),
        },
    );
    assert!(state.error.is_some());

    apply_delta(
        &mut state,
        Delta::TabPayload {
            tab: Tab::Events,
            payload: json!({"total_events": 664}),
        },
    );
    assert!(state.error.is_none());
    assert!(state.payload(Tab::Events).is_some());
}

#[test]
fn search_result_lives_outside_the_tab_cache() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SearchResult {
            query: "Silva".to_string(),
            payload: json!({"total_found": 2, "results": []}),
        },
    );

    assert_eq!(state.search_query, "Silva");
    assert!(state.search_result.is_some());
    assert!(state.payload(Tab::Search).is_none());
    assert!(!state.loading);
}

#[test]
fn search_error_sets_banner_but_keeps_previous_result() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SearchResult {
            query: "Silva".to_string(),
            payload: json!({"total_found": 1, "results": []}),
        },
    );
    apply_delta(
        &mut state,
        Delta::SearchError {
            endpoint: "/fighters/search/Jones".to_string(),
            message: "request failed".to_string(),
        },
    );

    let error = state.error.as_deref().expect("error banner set");
    assert!(error.contains("/fighters/search/Jones"));
    assert!(state.search_result.is_some());
    assert_eq!(state.search_query, "Silva");
}

#[test]
fn late_payload_for_background_tab_still_lands() {
    let mut state = AppState::new();
    let _ = state.select_tab(Tab::Advanced);
    let _ = state.select_tab(Tab::Overview);

    // The Advanced fetch resolves after the user navigated away.
    apply_delta(
        &mut state,
        Delta::TabPayload {
            tab: Tab::Advanced,
            payload: json!({"weight_class_analytics": {}}),
        },
    );

    assert_eq!(state.tab, Tab::Overview);
    assert!(state.payload(Tab::Advanced).is_some());
    assert!(state.select_tab(Tab::Advanced).is_none());
}

#[test]
fn log_deltas_land_in_console_ring() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Log("[INFO] hello".to_string()));
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] hello"));
}
