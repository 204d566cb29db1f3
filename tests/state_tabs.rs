use serde_json::json;

use ufc_terminal::state::{apply_delta, AppState, Delta, ProviderCommand, Tab};

#[test]
fn startup_fetches_overview_once() {
    let mut state = AppState::new();
    let commands = state.startup_commands();
    assert_eq!(commands, vec![ProviderCommand::FetchTab(Tab::Overview)]);
    assert!(state.loading);
    assert_eq!(state.tab, Tab::Overview);
}

#[test]
fn selecting_uncached_tab_issues_one_fetch() {
    let mut state = AppState::new();
    let cmd = state.select_tab(Tab::Performers);
    assert_eq!(cmd, Some(ProviderCommand::FetchTab(Tab::Performers)));
    assert!(state.loading);
    assert_eq!(
        Tab::Performers.endpoint_path(),
        Some("/fighters/top-performers")
    );
}

#[test]
fn cached_tab_never_refetches() {
    let mut state = AppState::new();
    assert!(state.select_tab(Tab::Events).is_some());

    apply_delta(
        &mut state,
        Delta::TabPayload {
            tab: Tab::Events,
            payload: json!({"total_events": 10}),
        },
    );
    assert!(!state.loading);
    assert!(state.payload(Tab::Events).is_some());

    // Memoized for the rest of the session, even across tab changes.
    assert!(state.select_tab(Tab::Overview).is_some());
    assert!(state.select_tab(Tab::Events).is_none());
    assert!(state.select_tab(Tab::Events).is_none());
}

#[test]
fn search_tab_never_fetches_on_selection() {
    let mut state = AppState::new();
    assert!(state.select_tab(Tab::Search).is_none());
    assert!(!state.loading);
}

#[test]
fn blank_search_is_a_noop() {
    let mut state = AppState::new();
    assert!(state.run_search("").is_none());
    assert!(state.run_search("   ").is_none());
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(state.search_result.is_none());
}

#[test]
fn repeated_search_always_fetches() {
    let mut state = AppState::new();
    let first = state.run_search("Silva");
    apply_delta(
        &mut state,
        Delta::SearchResult {
            query: "Silva".to_string(),
            payload: json!({"total_found": 1, "results": []}),
        },
    );
    let second = state.run_search("Silva");
    assert_eq!(
        first,
        Some(ProviderCommand::FetchSearch {
            query: "Silva".to_string()
        })
    );
    assert_eq!(first, second);
}

#[test]
fn search_query_is_trimmed_before_fetch() {
    let mut state = AppState::new();
    let cmd = state.run_search("  Silva ");
    assert_eq!(
        cmd,
        Some(ProviderCommand::FetchSearch {
            query: "Silva".to_string()
        })
    );
}

#[test]
fn every_non_search_tab_has_an_endpoint() {
    for tab in Tab::ALL {
        if tab == Tab::Search {
            assert!(tab.endpoint_path().is_none());
        } else {
            let path = tab.endpoint_path().expect("fixed endpoint");
            assert!(path.starts_with('/'));
        }
    }
}

#[test]
fn tab_cycling_covers_all_tabs() {
    let mut tab = Tab::Overview;
    for _ in 0..Tab::ALL.len() {
        tab = tab.next();
    }
    assert_eq!(tab, Tab::Overview);
    assert_eq!(Tab::Overview.prev(), Tab::Search);
}
