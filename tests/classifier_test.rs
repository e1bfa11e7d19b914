//! Integration tests for alert classification

use chrono::NaiveDate;
use omen::config::{
    default_patterns, default_registry, AlertThresholds, CorrelationPattern, EngineConfig,
    Expectation,
};
use omen::services::{classify_alerts, compute_indicators, IndicatorOutput};
use omen::types::*;
use std::collections::BTreeMap;

fn history(closes: &[f64]) -> PriceHistory {
    PriceHistory::from_closes(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes)
}

fn flat_then(base: f64, flat: usize, last: f64) -> Vec<f64> {
    let mut closes = vec![base; flat];
    closes.push(last);
    closes
}

/// 30 flat bars, a five-bar dip, then a jump that lifts MA5 over MA20.
fn golden_cross_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 30];
    closes.extend([99.0, 98.0, 97.0, 96.0, 95.0]);
    closes.push(130.0);
    closes
}

/// 30 flat bars, a five-bar rise, then a drop that pulls MA5 under MA20.
fn dead_cross_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 30];
    closes.extend([101.0, 102.0, 103.0, 104.0, 105.0]);
    closes.push(70.0);
    closes
}

fn run(entries: Vec<(&str, Vec<f64>)>) -> IndicatorOutput {
    let histories: BTreeMap<String, PriceHistory> = entries
        .into_iter()
        .map(|(code, closes)| (code.to_string(), history(&closes)))
        .collect();
    compute_indicators(&histories, &EngineConfig::default()).unwrap()
}

fn classify(output: &IndicatorOutput, correlations: &CorrelationMatrix) -> AlertSet {
    classify_alerts(
        &output.records,
        correlations,
        &default_registry(),
        &AlertThresholds::default(),
        &default_patterns(),
    )
}

#[test]
fn test_surge_scenario() {
    let output = run(vec![("GOLD", flat_then(100.0, 19, 110.0))]);
    let alerts = classify(&output, &output.correlations);

    assert_eq!(
        alerts.level1,
        vec!["💰 Gold: 110.00 (+10.00%) | Weekly +10.0%".to_string()]
    );
    assert_eq!(alerts.level2, vec!["📊 Gold daily +10.00%".to_string()]);
    assert_eq!(
        alerts.level3,
        vec![
            "🚀 Gold surge +10.00%".to_string(),
            "🔔 Gold at 52-week high (110.00)".to_string(),
        ]
    );
}

#[test]
fn test_plunge_and_low() {
    let output = run(vec![("SILVER", flat_then(30.0, 19, 27.0))]);
    let alerts = classify(&output, &output.correlations);

    assert_eq!(
        alerts.level3,
        vec![
            "💥 Silver plunge -10.00%".to_string(),
            "🔔 Silver at 52-week low (27.00)".to_string(),
        ]
    );
}

#[test]
fn test_quiet_day_only_level1() {
    // Below both thresholds, and not at an extreme
    let mut closes = vec![100.0; 10];
    closes.extend(vec![102.0; 9]);
    closes.push(101.0);
    let output = run(vec![("COPPER", closes)]);
    let alerts = classify(&output, &output.correlations);

    assert_eq!(alerts.level1.len(), 1);
    assert!(alerts.level1[0].starts_with("🟫 Copper: 101.00 (-0.98%)"));
    assert!(alerts.level2.is_empty());
    assert!(alerts.level3.is_empty());
}

#[test]
fn test_emergency_extremes_toggle() {
    let output = run(vec![("GOLD", flat_then(100.0, 19, 100.5))]);
    let mut thresholds = AlertThresholds::default();

    let alerts = classify_alerts(
        &output.records,
        &output.correlations,
        &default_registry(),
        &thresholds,
        &[],
    );
    assert_eq!(alerts.level3, vec!["🔔 Gold at 52-week high (100.50)".to_string()]);

    thresholds.emergency.extremes = false;
    let alerts = classify_alerts(
        &output.records,
        &output.correlations,
        &default_registry(),
        &thresholds,
        &[],
    );
    assert!(alerts.level3.is_empty());
}

#[test]
fn test_golden_cross_single_warning_line() {
    let output = run(vec![("GOLD", golden_cross_closes())]);
    let record = output.record("GOLD").unwrap();
    assert!(record.cross_signals.as_ref().unwrap().golden_cross_5_20());

    let alerts = classify(&output, &output.correlations);
    let crosses: Vec<&String> = alerts
        .level2
        .iter()
        .filter(|line| line.contains("cross"))
        .collect();
    assert_eq!(crosses, vec!["⚡ Gold MA5↗MA20 golden cross"]);
}

#[test]
fn test_dead_cross_single_warning_line() {
    let output = run(vec![("GOLD", dead_cross_closes())]);
    let record = output.record("GOLD").unwrap();
    assert!(record.cross_signals.as_ref().unwrap().dead_cross_5_20());

    let alerts = classify(&output, &output.correlations);
    assert_eq!(
        alerts.level2,
        vec![
            "📊 Gold daily -33.33%".to_string(),
            "⚡ Gold MA5↘MA20 dead cross".to_string(),
        ]
    );
}

#[test]
fn test_correlation_anomaly_line() {
    let output = run(vec![
        ("GOLD", flat_then(100.0, 19, 110.0)),
        ("USD_KRW", flat_then(1000.0, 19, 1010.0)),
    ]);
    let mut correlations = CorrelationMatrix::new();
    correlations.insert("GOLD", "USD_KRW", 0.9);

    let alerts = classify(&output, &correlations);
    assert_eq!(
        alerts.level3.last().map(String::as_str),
        Some("⚠️ Unusual pattern: USD/KRW +1.0% & Gold +10.0% (correlation: 0.90)")
    );
}

#[test]
fn test_expected_correlation_not_flagged() {
    let output = run(vec![
        ("GOLD", flat_then(100.0, 19, 100.5)),
        ("USD_KRW", flat_then(1000.0, 19, 1001.0)),
    ]);
    let mut correlations = CorrelationMatrix::new();
    correlations.insert("USD_KRW", "GOLD", -0.6);

    let alerts = classify(&output, &correlations);
    assert!(alerts.level3.iter().all(|line| !line.contains("Unusual")));
}

#[test]
fn test_missing_pair_skipped() {
    let output = run(vec![
        ("GOLD", flat_then(100.0, 19, 110.0)),
        ("SILVER", flat_then(30.0, 19, 31.0)),
    ]);
    let alerts = classify(&output, &CorrelationMatrix::new());
    assert!(alerts.level3.iter().all(|line| !line.contains("Unusual")));
}

#[test]
fn test_anomaly_needs_both_records_valid() {
    let output = run(vec![
        ("GOLD", flat_then(100.0, 19, 110.0)),
        ("USD_KRW", vec![1000.0; 5]),
    ]);
    let mut correlations = CorrelationMatrix::new();
    correlations.insert("GOLD", "USD_KRW", 0.9);

    let alerts = classify(&output, &correlations);
    assert!(alerts.level3.iter().all(|line| !line.contains("Unusual")));
}

#[test]
fn test_custom_positive_pattern() {
    let output = run(vec![
        ("GOLD", flat_then(100.0, 19, 100.5)),
        ("SILVER", flat_then(30.0, 19, 29.7)),
    ]);
    let mut correlations = CorrelationMatrix::new();
    correlations.insert("GOLD", "SILVER", 0.1);
    let patterns = vec![CorrelationPattern::new(
        "METALS",
        "GOLD",
        "SILVER",
        Expectation::Positive,
        0.5,
    )];

    let alerts = classify_alerts(
        &output.records,
        &correlations,
        &default_registry(),
        &AlertThresholds::default(),
        &patterns,
    );
    assert!(alerts
        .level3
        .contains(&"⚠️ Unusual pattern: Gold +0.5% & Silver -1.0% (correlation: 0.10)".to_string()));
}

#[test]
fn test_lines_follow_registry_order() {
    let output = run(vec![
        ("USD_KRW", flat_then(1000.0, 19, 1001.0)),
        ("SILVER", flat_then(30.0, 19, 30.03)),
        ("GOLD", flat_then(100.0, 19, 100.1)),
    ]);
    let alerts = classify(&output, &output.correlations);

    assert_eq!(alerts.level1.len(), 3);
    assert!(alerts.level1[0].contains("Gold"));
    assert!(alerts.level1[1].contains("Silver"));
    assert!(alerts.level1[2].contains("USD/KRW"));
}

#[test]
fn test_disabled_and_error_instruments_skipped() {
    let output = run(vec![
        ("PLATINUM", flat_then(900.0, 19, 990.0)),
        ("COPPER", vec![4.0; 10]),
        ("GOLD", flat_then(100.0, 19, 100.1)),
    ]);
    let alerts = classify(&output, &output.correlations);

    assert_eq!(alerts.level1.len(), 1);
    assert!(alerts.level1[0].contains("Gold"));
    assert!(alerts.level2.is_empty());
    assert!(alerts.level3.iter().all(|line| !line.contains("Platinum")));
}

#[test]
fn test_trend_glyph_needs_three_averages() {
    let rising: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
    let output = run(vec![("GOLD", rising)]);
    let alerts = classify(&output, &output.correlations);

    assert!(alerts.level1[0].ends_with(" 📈"));
    assert!(alerts
        .level3
        .contains(&"📈 Gold bullish alignment (MA5>MA20>MA60)".to_string()));
}

#[test]
fn test_bearish_alignment_and_down_glyph() {
    let falling: Vec<f64> = (0..70).map(|i| 200.0 - i as f64).collect();
    let output = run(vec![("GOLD", falling)]);
    let alerts = classify(&output, &output.correlations);

    assert_eq!(
        alerts.level1,
        vec!["💰 Gold: 131.00 (-0.76%) | Weekly -5.1% 📉".to_string()]
    );
    assert!(alerts
        .level3
        .contains(&"📉 Gold bearish alignment (MA5<MA20<MA60)".to_string()));
    assert!(alerts.level3.iter().all(|line| !line.contains("bullish")));
}

#[test]
fn test_mixed_positions_no_glyph() {
    // Above MA60, below MA5 and MA20
    let mut closes: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
    closes.push(160.0);
    let output = run(vec![("GOLD", closes)]);
    let record = output.record("GOLD").unwrap();
    assert_eq!(record.moving_average(5).unwrap().position, Position::Below);
    assert_eq!(record.moving_average(60).unwrap().position, Position::Above);

    let alerts = classify(&output, &output.correlations);
    assert_eq!(
        alerts.level1,
        vec!["💰 Gold: 160.00 (-5.33%) | Weekly -5.3%".to_string()]
    );
    assert!(!alerts.level1[0].ends_with(" 📈"));
    assert!(!alerts.level1[0].ends_with(" 📉"));
}

#[test]
fn test_classification_is_deterministic() {
    let output = run(vec![
        ("GOLD", golden_cross_closes()),
        ("SILVER", flat_then(30.0, 19, 27.0)),
        ("USD_KRW", flat_then(1000.0, 19, 1010.0)),
    ]);
    let mut correlations = CorrelationMatrix::new();
    correlations.insert("GOLD", "USD_KRW", 0.9);

    let first = classify(&output, &correlations);
    let second = classify(&output, &correlations);
    assert_eq!(first, second);
}

#[test]
fn test_empty_records_empty_alerts() {
    let alerts = classify(&IndicatorOutput::default(), &CorrelationMatrix::new());
    assert!(alerts.is_empty());
    assert_eq!(alerts.total(), 0);
}
