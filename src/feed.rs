use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api;
use crate::state::{Delta, ProviderCommand, Tab};

/// Spawn the background provider. Each command gets its own worker thread,
/// so independent fetches overlap freely; there is no dedup, throttle, or
/// retry, and a fetch that outlives the user's interest still reports its
/// delta (last write wins on the UI side).
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let tx = tx.clone();
            match cmd {
                ProviderCommand::FetchTab(tab) => {
                    thread::spawn(move || fetch_tab(tab, &tx));
                }
                ProviderCommand::FetchSearch { query } => {
                    thread::spawn(move || fetch_search(&query, &tx));
                }
            }
        }
    });
}

fn fetch_tab(tab: Tab, tx: &Sender<Delta>) {
    let Some(endpoint) = tab.endpoint_path() else {
        return;
    };
    match api::fetch_endpoint(endpoint) {
        Ok(payload) => {
            let _ = tx.send(Delta::TabPayload { tab, payload });
        }
        Err(err) => {
            let _ = tx.send(Delta::TabError {
                tab,
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            });
        }
    }
}

fn fetch_search(query: &str, tx: &Sender<Delta>) {
    let endpoint = api::search_path(query);
    match api::fetch_endpoint(&endpoint) {
        Ok(payload) => {
            let _ = tx.send(Delta::SearchResult {
                query: query.to_string(),
                payload,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::SearchError {
                endpoint,
                message: err.to_string(),
            });
        }
    }
}
