use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use ufc_terminal::payload::{
    age_group_rows, average_age, champion_rows, champion_summary_lines, country_distribution_bars,
    country_rows, events_by_year_bars, fighter_category_bars, fighter_rows, finish_method_bars,
    format_event_date, overview_stat_lines, parse_payload, recent_event_rows, search_rows,
    search_total, top_location_bars, total_events, weight_class_rows,
};

fn read_fixture(name: &str) -> Value {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_payload(&raw).expect("fixture should parse")
}

#[test]
fn overview_fixture_views() {
    let value = read_fixture("overview.json");

    let lines = overview_stat_lines(&value);
    assert!(lines.iter().any(|(l, v)| l == "Fighters" && v == "2142"));
    assert!(lines.iter().any(|(l, v)| l == "Avg win rate" && v == "61.4%"));
    assert!(lines
        .iter()
        .any(|(l, v)| l == "Coverage" && v.contains("11 Mar 1994")));

    let categories = fighter_category_bars(&value);
    assert_eq!(categories.len(), 5);
    assert!(categories.iter().any(|(l, c)| l == "Elite (80%+)" && *c == 118));

    let methods = finish_method_bars(&value);
    assert_eq!(methods.first().map(|(l, _)| l.as_str()), Some("Decision - Unanimous"));
    assert_eq!(methods.first().map(|(_, c)| *c), Some(2711));
}

#[test]
fn top_performers_fixture_views() {
    let value = read_fixture("top_performers.json");

    let by_win_rate = fighter_rows(&value, &["by_win_rate"]);
    assert_eq!(by_win_rate.len(), 2);
    assert_eq!(by_win_rate[0].name, "Islam Makhachev");
    assert_eq!(by_win_rate[0].record, "26-1-0");
    assert_eq!(by_win_rate[0].total_fights, 27);

    // Fields the API omitted come through as defaults, not failures.
    assert_eq!(by_win_rate[1].total_fights, 16);
    assert_eq!(fighter_rows(&value, &["rising_stars"]).len(), 1);
    assert!(fighter_rows(&value, &["no_such_section"]).is_empty());
}

#[test]
fn international_fixture_views() {
    let value = read_fixture("international.json");

    let rows = country_rows(&value);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].country, "Russia");
    assert_eq!(rows[0].fighter_count, 118);

    let distribution = country_distribution_bars(&value);
    assert_eq!(distribution.first().map(|(l, _)| l.as_str()), Some("United States"));
    assert_eq!(distribution.first().map(|(_, c)| *c), Some(812));
}

#[test]
fn events_fixture_views() {
    let value = read_fixture("events.json");

    assert_eq!(total_events(&value), 664);

    let events = recent_event_rows(&value);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].date, "07 Jun 2025");
    assert!(events[0].title.starts_with("UFC 316"));

    let by_year = events_by_year_bars(&value);
    assert_eq!(by_year.first().map(|(l, _)| l.as_str()), Some("2022"));
    assert_eq!(by_year.last().map(|(l, _)| l.as_str()), Some("2025"));

    let locations = top_location_bars(&value);
    assert_eq!(locations.first().map(|(l, _)| l.as_str()), Some("USA"));
}

#[test]
fn advanced_fixture_views() {
    let value = read_fixture("advanced.json");

    assert_eq!(average_age(&value), Some(31.2));

    let ages = age_group_rows(&value);
    assert_eq!(ages.len(), 4);
    assert_eq!(ages[0].group, "20-25");
    assert_eq!(ages[3].group, "36+");

    let weights = weight_class_rows(&value);
    assert_eq!(weights.len(), 3);
    // Best average win rate first.
    assert_eq!(weights[0].weight_class, "Lightweight");

    let finishers = fighter_rows(&value, &["performance_trends", "high_finishers"]);
    assert_eq!(finishers.len(), 1);
    assert_eq!(finishers[0].name, "Derrick Lewis");
}

#[test]
fn former_champions_fixture_views() {
    let value = read_fixture("former_champions.json");

    let rows = champion_rows(&value);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Georges St-Pierre");
    assert_eq!(rows[0].record, "2-0");
    assert_eq!(rows[0].win_pct, 100.0);
    assert_eq!(rows[1].lost_to, "Holly Holm");

    let summary = champion_summary_lines(&value);
    assert!(summary
        .iter()
        .any(|(l, v)| l == "Former champions" && v == "48"));
    assert!(summary
        .iter()
        .any(|(l, v)| l == "Overall win rate" && v == "55.7%"));
}

#[test]
fn search_fixture_views() {
    let value = read_fixture("search.json");

    assert_eq!(search_total(&value), 3);
    let rows = search_rows(&value);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name, "Anderson Silva");
    assert_eq!(rows[0].weight_lbs, Some(185.0));
    assert_eq!(rows[1].weight_lbs, None);
}

#[test]
fn null_and_empty_payloads_render_empty() {
    let null = parse_payload("null").expect("null should parse");
    assert!(null.is_null());
    assert!(overview_stat_lines(&null)
        .iter()
        .all(|(_, v)| v == "0" || v == "0.0%"));
    assert!(fighter_rows(&null, &["by_win_rate"]).is_empty());
    assert!(country_rows(&null).is_empty());
    assert!(recent_event_rows(&null).is_empty());
    assert!(champion_rows(&null).is_empty());
    assert!(search_rows(&null).is_empty());
    assert_eq!(search_total(&null), 0);

    let empty = parse_payload("   ").expect("blank should parse");
    assert!(empty.is_null());

    assert!(parse_payload("{not json").is_err());
}

#[test]
fn event_dates_pass_through_when_unparseable() {
    assert_eq!(format_event_date("2025-06-07"), "07 Jun 2025");
    assert_eq!(format_event_date("TBD"), "TBD");
    assert_eq!(format_event_date(""), "");
}
