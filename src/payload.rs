//! Permissive views over the analytics payloads.
//!
//! The API owns every payload shape; we hold each response as an opaque
//! `serde_json::Value` and pull display rows out of it here. Missing or
//! oddly-typed fields become blanks and zeros, never errors.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// Parse a response body, treating empty and `null` bodies as `Value::Null`
/// so downstream views render them as empty rather than failing.
pub fn parse_payload(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Value::Null);
    }
    serde_json::from_str(trimmed).context("invalid payload json")
}

// ---------------------------------------------------------------------------
// Overview

/// Label/value lines for the overview header block.
pub fn overview_stat_lines(value: &Value) -> Vec<(String, String)> {
    let db = value.get("database_stats").unwrap_or(&Value::Null);
    let perf = value.get("performance_summary").unwrap_or(&Value::Null);
    let coverage = value.get("data_coverage").unwrap_or(&Value::Null);

    let mut lines = vec![
        ("Fighters".to_string(), fmt_count(pick_u64(db, "total_fighters"))),
        ("Events".to_string(), fmt_count(pick_u64(db, "total_events"))),
        ("Fights".to_string(), fmt_count(pick_u64(db, "total_fights"))),
        (
            "Historical fights".to_string(),
            fmt_count(pick_u64(db, "historical_fights")),
        ),
        (
            "Active fighters".to_string(),
            fmt_count(pick_u64(perf, "total_active_fighters")),
        ),
        (
            "Avg win rate".to_string(),
            fmt_pct(pick_f64(perf, "average_win_rate")),
        ),
    ];

    let earliest = pick_string(coverage, "earliest_event");
    let latest = pick_string(coverage, "latest_event");
    if !earliest.is_empty() || !latest.is_empty() {
        lines.push((
            "Coverage".to_string(),
            format!(
                "{} - {}",
                format_event_date(&earliest),
                format_event_date(&latest)
            ),
        ));
    }
    lines
}

/// Fighter counts per performance category, e.g. "Elite (80%+)".
pub fn fighter_category_bars(value: &Value) -> Vec<(String, u64)> {
    let categories = value
        .get("performance_summary")
        .and_then(|v| v.get("fighter_categories"));
    object_counts(categories)
}

/// Finish-method counts, busiest method first.
pub fn finish_method_bars(value: &Value) -> Vec<(String, u64)> {
    let methods = value
        .get("fight_analysis")
        .and_then(|v| v.get("finish_methods"));
    let mut bars = object_counts(methods);
    bars.sort_by(|a, b| b.1.cmp(&a.1));
    bars
}

// ---------------------------------------------------------------------------
// Fighter rows (top performers, advanced trends)

#[derive(Debug, Clone, Default)]
pub struct FighterRow {
    pub name: String,
    pub record: String,
    pub win_rate: f64,
    pub finish_rate: f64,
    pub total_fights: u64,
    pub country: String,
    pub category: String,
}

/// Fighter rows from the array at `keys` inside the payload, in API order.
pub fn fighter_rows(value: &Value, keys: &[&str]) -> Vec<FighterRow> {
    let mut node = value;
    for key in keys {
        node = node.get(*key).unwrap_or(&Value::Null);
    }
    let Some(list) = node.as_array() else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(list.len());
    for entry in list {
        let name = pick_string(entry, "name");
        if name.is_empty() {
            continue;
        }
        let wins = pick_u64(entry, "wins");
        let losses = pick_u64(entry, "losses");
        let draws = pick_u64(entry, "draws");
        rows.push(FighterRow {
            name,
            record: format!("{wins}-{losses}-{draws}"),
            win_rate: pick_f64(entry, "win_rate"),
            finish_rate: pick_f64(entry, "finish_rate"),
            total_fights: pick_u64(entry, "total_fights"),
            country: pick_string(entry, "country"),
            category: pick_string(entry, "category"),
        });
    }
    rows
}

// ---------------------------------------------------------------------------
// International

#[derive(Debug, Clone, Default)]
pub struct CountryRow {
    pub country: String,
    pub fighter_count: u64,
    pub avg_win_rate: f64,
    pub total_wins: u64,
    pub total_fights: u64,
}

/// Per-country performance rows in API order (best average win rate first).
pub fn country_rows(value: &Value) -> Vec<CountryRow> {
    let Some(list) = value.get("country_performance").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|entry| {
            let country = pick_string(entry, "country");
            if country.is_empty() {
                return None;
            }
            Some(CountryRow {
                country,
                fighter_count: pick_u64(entry, "fighter_count"),
                avg_win_rate: pick_f64(entry, "avg_win_rate"),
                total_wins: pick_u64(entry, "total_wins"),
                total_fights: pick_u64(entry, "total_fights"),
            })
        })
        .collect()
}

/// Fighter headcount per country, largest first.
pub fn country_distribution_bars(value: &Value) -> Vec<(String, u64)> {
    let mut bars = object_counts(value.get("country_distribution"));
    bars.sort_by(|a, b| b.1.cmp(&a.1));
    bars
}

// ---------------------------------------------------------------------------
// Events

#[derive(Debug, Clone, Default)]
pub struct EventRow {
    pub title: String,
    pub date: String,
    pub location: String,
}

pub fn recent_event_rows(value: &Value) -> Vec<EventRow> {
    let Some(list) = value.get("recent_events").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|entry| {
            let title = pick_string(entry, "title");
            if title.is_empty() {
                return None;
            }
            Some(EventRow {
                title,
                date: format_event_date(&pick_string(entry, "date")),
                location: pick_string(entry, "location"),
            })
        })
        .collect()
}

/// Event counts per year, oldest year first.
pub fn events_by_year_bars(value: &Value) -> Vec<(String, u64)> {
    let mut bars = object_counts(value.get("events_by_year"));
    bars.sort_by(|a, b| a.0.cmp(&b.0));
    bars
}

pub fn top_location_bars(value: &Value) -> Vec<(String, u64)> {
    let mut bars = object_counts(value.get("top_locations"));
    bars.sort_by(|a, b| b.1.cmp(&a.1));
    bars
}

pub fn total_events(value: &Value) -> u64 {
    pick_u64(value, "total_events")
}

// ---------------------------------------------------------------------------
// Advanced analytics

#[derive(Debug, Clone, Default)]
pub struct AgeGroupRow {
    pub group: String,
    pub count: u64,
    pub avg_win_rate: f64,
}

/// Age-bracket performance, youngest bracket first.
pub fn age_group_rows(value: &Value) -> Vec<AgeGroupRow> {
    let Some(groups) = value
        .get("age_analytics")
        .and_then(|v| v.get("age_group_performance"))
        .and_then(|v| v.as_object())
    else {
        return Vec::new();
    };
    let mut rows: Vec<AgeGroupRow> = groups
        .iter()
        .map(|(group, stats)| AgeGroupRow {
            group: group.clone(),
            count: pick_u64(stats, "count"),
            avg_win_rate: pick_f64(stats, "avg_win_rate"),
        })
        .collect();
    // Bracket labels ("20-25" .. "36+") sort correctly as strings.
    rows.sort_by(|a, b| a.group.cmp(&b.group));
    rows
}

pub fn average_age(value: &Value) -> Option<f64> {
    value
        .get("age_analytics")
        .and_then(|v| v.get("average_age"))
        .and_then(|v| v.as_f64())
}

#[derive(Debug, Clone, Default)]
pub struct WeightClassRow {
    pub weight_class: String,
    pub fighter_count: u64,
    pub avg_win_rate: f64,
    pub avg_finish_rate: f64,
}

/// Weight-class performance, best average win rate first.
pub fn weight_class_rows(value: &Value) -> Vec<WeightClassRow> {
    let Some(classes) = value
        .get("weight_class_analytics")
        .and_then(|v| v.as_object())
    else {
        return Vec::new();
    };
    let mut rows: Vec<WeightClassRow> = classes
        .iter()
        .map(|(weight_class, stats)| WeightClassRow {
            weight_class: weight_class.clone(),
            fighter_count: pick_u64(stats, "fighter_count"),
            avg_win_rate: pick_f64(stats, "avg_win_rate"),
            avg_finish_rate: pick_f64(stats, "avg_finish_rate"),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.avg_win_rate
            .partial_cmp(&a.avg_win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

// ---------------------------------------------------------------------------
// Former champions

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChampionRow {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "record_after_belt_loss")]
    pub record: String,
    #[serde(default, rename = "win_percentage_after_belt_loss")]
    pub win_pct: f64,
    #[serde(default, rename = "total_fights_after_belt_loss")]
    pub total_fights: u64,
    #[serde(default)]
    pub weight_class: String,
    #[serde(default)]
    pub lost_to: String,
}

/// Post-belt records per former champion, in API order (best win rate
/// first). Entries that do not look like champion objects are skipped.
pub fn champion_rows(value: &Value) -> Vec<ChampionRow> {
    let Some(list) = value.get("former_champions").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|entry| serde_json::from_value::<ChampionRow>(entry.clone()).ok())
        .filter(|row| !row.name.is_empty())
        .collect()
}

pub fn champion_summary_lines(value: &Value) -> Vec<(String, String)> {
    let summary = value.get("summary").unwrap_or(&Value::Null);
    vec![
        (
            "Former champions".to_string(),
            fmt_count(pick_u64(summary, "total_former_champions")),
        ),
        (
            "Wins after belt loss".to_string(),
            fmt_count(pick_u64(summary, "total_wins_after_belt_loss")),
        ),
        (
            "Losses after belt loss".to_string(),
            fmt_count(pick_u64(summary, "total_losses_after_belt_loss")),
        ),
        (
            "Overall win rate".to_string(),
            fmt_pct(pick_f64(summary, "overall_win_percentage_after_belt_loss")),
        ),
        (
            "Avg fights per champion".to_string(),
            format!(
                "{:.1}",
                pick_f64(summary, "average_fights_per_former_champion")
            ),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Search

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub record: String,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub weight_lbs: Option<f64>,
}

pub fn search_rows(value: &Value) -> Vec<SearchRow> {
    let Some(list) = value.get("results").and_then(|v| v.as_array()) else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|entry| serde_json::from_value::<SearchRow>(entry.clone()).ok())
        .filter(|row| !row.name.is_empty())
        .collect()
}

pub fn search_total(value: &Value) -> u64 {
    pick_u64(value, "total_found")
}

// ---------------------------------------------------------------------------
// Helpers

/// Render an API date (`YYYY-MM-DD`) as e.g. `14 Jun 2025`; anything
/// unparseable passes through untouched.
pub fn format_event_date(raw: &str) -> String {
    let trimmed = raw.trim();
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%d %b %Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

fn object_counts(value: Option<&Value>) -> Vec<(String, u64)> {
    let Some(map) = value.and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, count)| (key.clone(), count.as_u64().unwrap_or(0)))
        .collect()
}

fn pick_string(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn pick_u64(value: &Value, key: &str) -> u64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn pick_f64(value: &Value, key: &str) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn fmt_count(count: u64) -> String {
    count.to_string()
}

fn fmt_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}
