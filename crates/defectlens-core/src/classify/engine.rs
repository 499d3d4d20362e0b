use crate::classify::normalize_label;
use crate::classify::outcome::{BatchOutcome, RecordOutcome};
use crate::classify::severity::{least_severe, severity_order};
use crate::config::schema::{QuestionThresholds, SideThresholds};
use crate::model::{ModelKind, Record, Side};

/// Map a score to a category for one side: the first category in map
/// order whose range contains the score. `None` means "no category",
/// which is an expected state (missing score, gap, out of bounds), not
/// an error.
pub fn classify_score(score: f64, thresholds: &SideThresholds) -> Option<&str> {
    if score.is_nan() {
        return None;
    }
    thresholds
        .iter()
        .find(|(_, range)| range.contains(score))
        .map(|(category, _)| category)
}

/// Classify one record across all sides of a question.
///
/// Sides are visited in canonical order; sides with a missing or NaN
/// score are skipped. When sides disagree, the highest-severity category
/// wins outright, no matter how many sides report a milder one. If the
/// severity order lists none of the collected categories (malformed
/// config), the first collected category stands in as a fallback.
pub fn classify_record(
    record: &Record,
    thresholds: &QuestionThresholds,
    score_prefix: &str,
) -> RecordOutcome {
    let mut collected: Vec<(Side, &str)> = Vec::new();
    for side in Side::ALL {
        let Some(side_thresholds) = thresholds.side(side) else {
            continue;
        };
        let Some(score) = record.score(score_prefix, side) else {
            continue;
        };
        if let Some(category) = classify_score(score, side_thresholds) {
            collected.push((side, category));
        }
    }

    if collected.is_empty() {
        return RecordOutcome::unclassified();
    }

    let order = severity_order(thresholds);
    let predicted = order
        .iter()
        .map(String::as_str)
        .find(|severe| collected.iter().any(|(_, c)| c == severe))
        .unwrap_or(collected[0].1);

    // Least-severe results are not attributed to specific sides.
    let contributing_sides = if least_severe(&order) == Some(predicted) {
        Vec::new()
    } else {
        collected
            .iter()
            .filter(|(_, c)| *c == predicted)
            .map(|(side, _)| *side)
            .collect()
    };

    RecordOutcome {
        predicted: Some(predicted.to_string()),
        contributing_sides,
    }
}

/// Classify a whole batch in place, writing the model's answer and
/// contributing-sides fields into each record, and report aggregate
/// counts against the ground-truth field.
pub fn classify_batch(
    records: &mut [Record],
    thresholds: &QuestionThresholds,
    model: ModelKind,
    actual_field: &str,
) -> BatchOutcome {
    let mut classified = 0;
    let mut unclassified = 0;
    let mut changed = 0;

    for record in records.iter_mut() {
        let outcome = classify_record(record, thresholds, model.score_prefix());

        let previous = record.text(model.answer_field()).map(normalize_label);
        let current = outcome.predicted.as_deref().map(normalize_label);
        if let Some(previous) = previous {
            if Some(previous) != current {
                changed += 1;
            }
        }

        match &outcome.predicted {
            Some(category) => {
                classified += 1;
                record.set_text(model.answer_field(), category.clone());
            }
            None => {
                unclassified += 1;
                record.set(model.answer_field(), crate::model::FieldValue::Null);
            }
        }
        record.set_text(model.contributing_field(), outcome.contributing_joined());
    }

    let accuracy = batch_accuracy(records, model.answer_field(), actual_field);
    BatchOutcome {
        total: records.len(),
        classified,
        unclassified,
        changed,
        accuracy,
    }
}

/// Percentage of records whose predicted field matches the actual field,
/// compared after normalization, over records where both are non-blank.
/// 0 when no such pairs exist.
pub fn batch_accuracy(records: &[Record], predicted_field: &str, actual_field: &str) -> f64 {
    let mut correct = 0usize;
    let mut total = 0usize;
    for record in records {
        let (Some(predicted), Some(actual)) =
            (record.text(predicted_field), record.text(actual_field))
        else {
            continue;
        };
        total += 1;
        if normalize_label(predicted) == normalize_label(actual) {
            correct += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}
