//! Unit tests for top-N candidate selection

use signalq::models::score::ScoreRecord;
use signalq::seeder::ranking::select_candidates;

fn record(ticker: &str, analyst: f64, price_target: f64) -> ScoreRecord {
    ScoreRecord {
        ticker: ticker.to_string(),
        year_month: "2024_06".to_string(),
        analyst_avg_score: Some(analyst),
        price_target_score: Some(price_target),
    }
}

fn unscored(ticker: &str) -> ScoreRecord {
    ScoreRecord {
        ticker: ticker.to_string(),
        year_month: "2024_06".to_string(),
        analyst_avg_score: None,
        price_target_score: None,
    }
}

#[test]
fn selects_highest_composites_first() {
    // Composites: AAA 1.0, BBB 0.8, CCC 0.6, DDD 0.2
    let records = vec![
        record("DDD", 0.2, 0.2),
        record("BBB", 0.8, 0.8),
        record("AAA", 1.0, 1.0),
        record("CCC", 0.6, 0.6),
    ];
    let selected = select_candidates(&records, 3);
    let tickers: Vec<&str> = selected.iter().map(|c| c.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAA", "BBB", "CCC"]);
}

#[test]
fn equal_composites_break_by_ticker() {
    // Composites: A 0.9, B and C both 0.5, D 0.1
    let records = vec![
        record("D", 0.1, 0.1),
        record("C", 0.5, 0.5),
        record("A", 0.9, 0.9),
        record("B", 0.5, 0.5),
    ];
    let selected = select_candidates(&records, 2);
    let tickers: Vec<&str> = selected.iter().map(|c| c.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["A", "B"]);
}

#[test]
fn selection_is_reproducible_across_input_orderings() {
    let mut records = vec![
        record("C", 0.5, 0.5),
        record("B", 0.5, 0.5),
        record("A", 0.9, 0.9),
        record("D", 0.1, 0.1),
    ];
    let first = select_candidates(&records, 2);
    records.reverse();
    let second = select_candidates(&records, 2);
    assert_eq!(first, second);
}

#[test]
fn unscored_records_are_excluded() {
    let records = vec![
        unscored("ZZZ"),
        record("AAA", 0.4, 0.4),
        ScoreRecord {
            ticker: "YYY".to_string(),
            year_month: "2024_06".to_string(),
            analyst_avg_score: Some(99.0),
            price_target_score: None,
        },
    ];
    let selected = select_candidates(&records, 5);
    let tickers: Vec<&str> = selected.iter().map(|c| c.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAA"]);
}

#[test]
fn top_n_larger_than_universe_returns_everything_ranked() {
    let records = vec![record("BBB", 0.5, 0.5), record("AAA", 0.9, 0.9)];
    let selected = select_candidates(&records, 10);
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].ticker, "AAA");
}

#[test]
fn weighting_favors_analyst_score() {
    // Same total, different split: analyst-heavy wins under 0.6/0.4.
    let records = vec![record("ANA", 1.0, 0.0), record("TGT", 0.0, 1.0)];
    let selected = select_candidates(&records, 1);
    assert_eq!(selected[0].ticker, "ANA");
}
