use std::collections::{HashMap, VecDeque};

use serde_json::Value;

/// Dashboard tabs. Exactly one is active at any time; Overview is the
/// default landing tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Overview,
    FormerChampions,
    Performers,
    International,
    Events,
    Advanced,
    Search,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Overview,
        Tab::FormerChampions,
        Tab::Performers,
        Tab::International,
        Tab::Events,
        Tab::Advanced,
        Tab::Search,
    ];

    /// API path backing this tab. Search has no fixed path; its endpoint is
    /// parameterized by the query and built in `api::search_path`.
    pub fn endpoint_path(self) -> Option<&'static str> {
        match self {
            Tab::Overview => Some("/overview"),
            Tab::FormerChampions => Some("/former-champions/analysis"),
            Tab::Performers => Some("/fighters/top-performers"),
            Tab::International => Some("/analytics/international"),
            Tab::Events => Some("/events/analysis"),
            Tab::Advanced => Some("/analytics/advanced"),
            Tab::Search => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::FormerChampions => "Ex-Champions",
            Tab::Performers => "Top Performers",
            Tab::International => "International",
            Tab::Events => "Events",
            Tab::Advanced => "Advanced",
            Tab::Search => "Search",
        }
    }

    pub fn next(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Tab::ALL[(idx + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which top-performers ranking is on screen. All four come from the same
/// `/fighters/top-performers` payload; cycling never refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformerSection {
    WinRate,
    FinishRate,
    MostActive,
    RisingStars,
}

impl PerformerSection {
    pub fn label(self) -> &'static str {
        match self {
            PerformerSection::WinRate => "WIN RATE",
            PerformerSection::FinishRate => "FINISH RATE",
            PerformerSection::MostActive => "MOST ACTIVE",
            PerformerSection::RisingStars => "RISING STARS",
        }
    }

    /// Key of the backing array inside the top-performers payload.
    pub fn payload_key(self) -> &'static str {
        match self {
            PerformerSection::WinRate => "by_win_rate",
            PerformerSection::FinishRate => "by_finish_rate",
            PerformerSection::MostActive => "most_active",
            PerformerSection::RisingStars => "rising_stars",
        }
    }

    pub fn next(self) -> PerformerSection {
        match self {
            PerformerSection::WinRate => PerformerSection::FinishRate,
            PerformerSection::FinishRate => PerformerSection::MostActive,
            PerformerSection::MostActive => PerformerSection::RisingStars,
            PerformerSection::RisingStars => PerformerSection::WinRate,
        }
    }
}

/// Work requests sent to the provider thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchTab(Tab),
    FetchSearch { query: String },
}

/// State mutations sent back from the provider thread.
#[derive(Debug, Clone)]
pub enum Delta {
    TabPayload {
        tab: Tab,
        payload: Value,
    },
    TabError {
        tab: Tab,
        endpoint: String,
        message: String,
    },
    SearchResult {
        query: String,
        payload: Value,
    },
    SearchError {
        endpoint: String,
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    /// Per-session payload cache. Absent = not fetched yet. Entries are
    /// never evicted or refreshed; a populated slot stays as-is for the
    /// lifetime of the process even if stale.
    pub cache: HashMap<Tab, Value>,
    /// Most recently completed search query and its result payload. Kept
    /// apart from `cache` because search is parameterized and never
    /// memoized.
    pub search_query: String,
    pub search_result: Option<Value>,
    pub search_input: String,
    pub search_editing: bool,
    /// Coarse busy indicator: set when any fetch starts, cleared when any
    /// fetch completes, even with others still outstanding.
    pub loading: bool,
    /// Message for the most recent failed fetch, naming the endpoint.
    /// Overwritten per completed attempt; cleared by any success.
    pub error: Option<String>,
    pub performer_section: PerformerSection,
    pub scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Overview,
            cache: HashMap::with_capacity(Tab::ALL.len()),
            search_query: String::new(),
            search_result: None,
            search_input: String::new(),
            search_editing: false,
            loading: false,
            error: None,
            performer_section: PerformerSection::WinRate,
            scroll: 0,
            logs: VecDeque::with_capacity(64),
            help_overlay: false,
        }
    }

    /// Commands to issue at session start, before any tab selection.
    /// Overview is fetched unconditionally because it is the landing tab.
    pub fn startup_commands(&mut self) -> Vec<ProviderCommand> {
        self.loading = true;
        vec![ProviderCommand::FetchTab(Tab::Overview)]
    }

    /// Activate a tab. Returns the fetch to issue when the tab's payload is
    /// absent; a cached tab never refetches, and the Search tab only hits
    /// the network through an explicit `run_search`.
    pub fn select_tab(&mut self, tab: Tab) -> Option<ProviderCommand> {
        self.tab = tab;
        self.scroll = 0;
        if tab == Tab::Search || self.cache.contains_key(&tab) {
            return None;
        }
        self.loading = true;
        Some(ProviderCommand::FetchTab(tab))
    }

    /// Submit a fighter search. Blank queries are a no-op; everything else
    /// always hits the network, even for a repeated query.
    pub fn run_search(&mut self, query: &str) -> Option<ProviderCommand> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.loading = true;
        Some(ProviderCommand::FetchSearch {
            query: trimmed.to_string(),
        })
    }

    pub fn payload(&self, tab: Tab) -> Option<&Value> {
        self.cache.get(&tab)
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn cycle_performer_section(&mut self) {
        self.performer_section = self.performer_section.next();
        self.scroll = 0;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 64;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::TabPayload { tab, payload } => {
            // A late response for a tab the user has left still lands in its
            // slot; there is no cancellation or stale-response discard, and
            // concurrent fetches for the same slot resolve last-write-wins.
            state.cache.insert(tab, payload);
            state.error = None;
            state.loading = false;
            if let Some(path) = tab.endpoint_path() {
                state.push_log(format!("[INFO] Loaded {path}"));
            }
        }
        Delta::TabError {
            tab: _,
            endpoint,
            message,
        } => {
            // The slot stays absent so the next visit to this tab retries.
            state.error = Some(format!("{endpoint} fetch failed: {message}"));
            state.loading = false;
            state.push_log(format!("[WARN] {endpoint} fetch failed: {message}"));
        }
        Delta::SearchResult { query, payload } => {
            state.search_query = query;
            state.search_result = Some(payload);
            state.error = None;
            state.loading = false;
            state.push_log(format!("[INFO] Search done: {}", state.search_query));
        }
        Delta::SearchError { endpoint, message } => {
            state.error = Some(format!("{endpoint} fetch failed: {message}"));
            state.loading = false;
            state.push_log(format!("[WARN] {endpoint} fetch failed: {message}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
