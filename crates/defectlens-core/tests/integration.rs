//! End-to-end tests over the public API: parse a threshold document,
//! classify a record batch, build matrices, repair edited thresholds and
//! run the optimizer, the way the CLI drives the engine.

use defectlens_core::classify::classify_record;
use defectlens_core::config::builtin::load_preset;
use defectlens_core::config::parse_config_str;
use defectlens_core::config::schema::{ScoreRange, ThresholdConfig};
use defectlens_core::matrix::build_matrix;
use defectlens_core::model::{ModelKind, Record, Side};
use defectlens_core::tweak::{optimize, repair_side, OptimizerParams};
use defectlens_core::{classify_records, compare_thresholds};

fn scratch_config() -> ThresholdConfig {
    parse_config_str(
        r#"{
            "physicalConditionScratch": {
                "back": {
                    "no scratches": [0, 50],
                    "minor scratch": [50, 80],
                    "major scratch": [80, 100]
                },
                "front": {
                    "no scratches": [0, 50],
                    "minor scratch": [50, 80],
                    "major scratch": [80, 100]
                }
            }
        }"#,
    )
    .unwrap()
}

fn record(fields: &[(&str, f64)], actual: &str) -> Record {
    let mut rec = Record::new();
    for (field, value) in fields {
        rec.set_number(*field, *value);
    }
    rec.set_text("final_answer", actual);
    rec
}

// ---------------------------------------------------------------------------
// Classify a batch end to end and check answers and aggregate counts
// ---------------------------------------------------------------------------
#[test]
fn classify_batch_end_to_end() {
    let config = scratch_config();
    let mut records = vec![
        record(&[("back_score", 90.0)], "major scratch"),
        record(&[("back_score", 85.0), ("front_score", 40.0)], "major scratch"),
        record(&[("back_score", 10.0), ("front_score", 20.0)], "no scratches"),
        record(&[], "minor scratch"),
    ];

    let result = classify_records(
        &mut records,
        &config,
        None,
        ModelKind::Deployed,
        "final_answer",
    )
    .unwrap();

    assert_eq!(result.question, "physicalConditionScratch");
    assert_eq!(result.outcome.total, 4);
    assert_eq!(result.outcome.classified, 3);
    assert_eq!(result.outcome.unclassified, 1);
    assert!((result.outcome.accuracy - 100.0).abs() < 1e-9);

    assert_eq!(records[0].text("cscan_answer"), Some("major scratch"));
    assert_eq!(records[0].text("contributing_sides"), Some("back"));
    // Side B's milder category does not dilute the verdict.
    assert_eq!(records[1].text("cscan_answer"), Some("major scratch"));
    assert_eq!(records[1].text("contributing_sides"), Some("back"));
    // Least-severe verdicts carry no contributing sides.
    assert_eq!(records[2].text("cscan_answer"), Some("no scratches"));
    assert_eq!(records[2].text("contributing_sides"), None);
    assert!(records[3].is_blank("cscan_answer"));
}

// ---------------------------------------------------------------------------
// Tweak flow: edit thresholds, repair, re-classify, compare matrices
// ---------------------------------------------------------------------------
#[test]
fn tweak_and_compare_end_to_end() {
    let original = scratch_config();
    let mut records = Vec::new();
    // Scores in [80, 95) are truly "minor scratch"; the original config
    // calls them "major scratch".
    for score in [82.0, 88.0, 92.0] {
        records.push(record(&[("back_score", score)], "minor scratch"));
    }
    records.push(record(&[("back_score", 97.0)], "major scratch"));
    records.push(record(&[("back_score", 30.0)], "no scratches"));

    // The user drags the minor/major boundary from 80 to 95.
    let mut adjusted = original.clone();
    let question = adjusted.question("physicalConditionScratch").unwrap().clone();
    let mut edited = question.side(Side::Back).unwrap().clone();
    edited.set("minor scratch", ScoreRange::new(50, 95));
    edited.set("major scratch", ScoreRange::new(95, 100));
    let repaired = repair_side(&edited);
    // Already contiguous, so repair changes nothing.
    assert_eq!(repaired, edited);
    let mut question = question;
    question.set_side(Side::Back, repaired);
    adjusted.set_question("physicalConditionScratch", question);

    let comparison = compare_thresholds(
        &records,
        &original,
        &adjusted,
        Some("physicalConditionScratch"),
        ModelKind::Deployed,
        "final_answer",
    )
    .unwrap();

    assert!((comparison.reference.accuracy - 40.0).abs() < 1e-9);
    assert!((comparison.adjusted.accuracy - 100.0).abs() < 1e-9);
    assert!((comparison.accuracy_delta - 60.0).abs() < 1e-9);
    assert_eq!(comparison.changed_records, 3);
    // Both matrices share the original config's label axis.
    assert_eq!(comparison.reference.labels[0], "no scratches");
    assert_eq!(comparison.adjusted.labels[0], "no scratches");
}

// ---------------------------------------------------------------------------
// Optimizer finds the boundary the adjusted config should have used
// ---------------------------------------------------------------------------
#[test]
fn optimizer_end_to_end() {
    let config = scratch_config();
    let mut records = Vec::new();
    for score in [82.0, 84.0, 88.0] {
        records.push(record(&[("back_score", score)], "minor scratch"));
    }
    records.push(record(&[("back_score", 95.0)], "major scratch"));
    records.push(record(&[("back_score", 20.0)], "no scratches"));

    let outcome = optimize(
        &records,
        &config,
        "physicalConditionScratch",
        "",
        "final_answer",
        Some(Side::Back),
        &OptimizerParams::default(),
    )
    .unwrap();

    assert!((outcome.accuracy - 100.0).abs() < 1e-9);
    let best = outcome
        .config
        .question("physicalConditionScratch")
        .unwrap()
        .side(Side::Back)
        .unwrap();
    // The minor/major boundary moved up past 88.
    let minor = best.get("minor scratch").unwrap();
    assert!(minor.max > 88);
}

// ---------------------------------------------------------------------------
// Candidate model columns: new_<side>_score in, new_cscan_answer out
// ---------------------------------------------------------------------------
#[test]
fn candidate_model_uses_new_columns() {
    let config = scratch_config();
    let mut rec = Record::new();
    rec.set_number("back_score", 10.0);
    rec.set_number("new_back_score", 90.0);
    rec.set_text("final_answer", "major scratch");
    let mut records = vec![rec];

    classify_records(
        &mut records,
        &config,
        Some("physicalConditionScratch"),
        ModelKind::Candidate,
        "final_answer",
    )
    .unwrap();

    assert_eq!(records[0].text("new_cscan_answer"), Some("major scratch"));
    assert_eq!(records[0].text("new_contributing_sides"), Some("back"));
    assert!(records[0].is_blank("cscan_answer"));
}

// ---------------------------------------------------------------------------
// Builtin panel preset: alias merge folds into the matrix axis
// ---------------------------------------------------------------------------
#[test]
fn panel_preset_with_alias_merge() {
    let config = load_preset("panel").unwrap();
    let question = config.question("physicalConditionPanel").unwrap();

    let mut rec = Record::new();
    rec.set_number("left_score", 90.0);
    rec.set_text("final_answer", "Glass Panel Damaged");
    let outcome = classify_record(&rec, question, "");
    assert_eq!(outcome.predicted.as_deref(), Some("cracked or broken panel"));
    assert_eq!(outcome.contributing_sides, vec![Side::Left]);

    let mut records = vec![rec];
    classify_records(
        &mut records,
        &config,
        None,
        ModelKind::Deployed,
        "final_answer",
    )
    .unwrap();
    let matrix = build_matrix(
        &records,
        "cscan_answer",
        "final_answer",
        &question.category_order(),
        "physicalConditionPanel",
    );
    assert_eq!(matrix.labels, vec!["cracked or broken panel"]);
    assert_eq!(matrix.correct, 1);
}

// ---------------------------------------------------------------------------
// Records parsed straight from the JSON batch format
// ---------------------------------------------------------------------------
#[test]
fn json_batch_round_trip() {
    let json = r#"[
        {"pdd_txn_id": "t1", "back_score": 90.0, "front_score": "40", "final_answer": "major scratch"},
        {"pdd_txn_id": "t2", "back_score": null, "final_answer": "no scratches"}
    ]"#;
    let mut records: Vec<Record> = serde_json::from_str(json).unwrap();
    let config = scratch_config();

    let result = classify_records(
        &mut records,
        &config,
        None,
        ModelKind::Deployed,
        "final_answer",
    )
    .unwrap();

    assert_eq!(result.outcome.classified, 1);
    assert_eq!(result.outcome.unclassified, 1);
    assert_eq!(records[0].text("cscan_answer"), Some("major scratch"));
}
