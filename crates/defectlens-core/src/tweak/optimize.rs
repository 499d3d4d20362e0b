use crate::classify::classify_record;
use crate::config::schema::{QuestionThresholds, ScoreRange, SideThresholds, ThresholdConfig};
use crate::error::EngineError;
use crate::matrix::normalize_answer;
use crate::model::{Record, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Search tuning knobs. The defaults match slider-granularity editing:
/// boundaries move in steps of 10 (and half-steps of 5), and at most 100
/// candidates are scored per side to keep the search interactive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerParams {
    pub step: u32,
    pub candidate_cap: usize,
}

impl Default for OptimizerParams {
    fn default() -> OptimizerParams {
        OptimizerParams {
            step: 10,
            candidate_cap: 100,
        }
    }
}

/// Result of a threshold search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeOutcome {
    /// The adjusted config with the best thresholds found substituted in.
    pub config: ThresholdConfig,
    /// Accuracy (percent) of the best thresholds over the record batch.
    pub accuracy: f64,
    /// Candidates scored across all optimized sides.
    pub evaluated: usize,
}

/// Local search over threshold boundaries, maximizing classification
/// accuracy against the ground-truth field.
///
/// Optimizes the named side, or every side of the question in document
/// order when no side is given. Each side's search perturbs one
/// category's min and max at a time by `{-step, -step/2, 0, +step/2,
/// +step}`, keeping the other categories fixed; invalid candidates
/// (min >= max, bounds outside [0, 100]) are dropped, the unmodified side
/// is always in the pool, and the pool is de-duplicated and capped. A
/// candidate replaces the incumbent only on strictly higher accuracy, so
/// ties keep the earliest candidate. This is a bounded heuristic, not an
/// exhaustive search.
pub fn optimize(
    records: &[Record],
    adjusted: &ThresholdConfig,
    question: &str,
    score_prefix: &str,
    actual_field: &str,
    target_side: Option<Side>,
    params: &OptimizerParams,
) -> Result<OptimizeOutcome, EngineError> {
    let thresholds = adjusted
        .resolve(question)
        .ok_or_else(|| EngineError::QuestionNotFound(question.to_string()))?;

    let sides: Vec<Side> = match target_side {
        Some(side) => {
            if thresholds.side(side).is_none() {
                return Err(EngineError::ConfigInvalid(format!(
                    "question '{}' has no thresholds for side '{}'",
                    question, side
                )));
            }
            vec![side]
        }
        None => thresholds.side_names().collect(),
    };

    let mut best = thresholds.clone();
    let mut best_accuracy = score(records, &best, score_prefix, actual_field, question);
    let mut evaluated = 0usize;

    for side in sides {
        let Some(current) = best.side(side) else {
            continue;
        };
        let candidates = side_candidates(current, params);
        debug!(
            side = %side,
            candidates = candidates.len(),
            "scoring threshold candidates"
        );

        let mut side_best: Option<SideThresholds> = None;
        let mut side_best_accuracy = -1.0f64;
        for candidate in candidates {
            let mut trial = best.clone();
            trial.set_side(side, candidate.clone());
            let accuracy = score(records, &trial, score_prefix, actual_field, question);
            evaluated += 1;
            if accuracy > side_best_accuracy {
                side_best_accuracy = accuracy;
                side_best = Some(candidate);
            }
        }

        if let Some(winner) = side_best {
            best.set_side(side, winner);
            best_accuracy = side_best_accuracy;
        }
    }

    let mut config = adjusted.clone();
    config.set_question(question, best);
    Ok(OptimizeOutcome {
        config,
        accuracy: best_accuracy,
        evaluated,
    })
}

/// Candidate threshold maps for one side: single-category min/max
/// perturbations, the unmodified side appended last, de-duplicated and
/// capped.
fn side_candidates(current: &SideThresholds, params: &OptimizerParams) -> Vec<SideThresholds> {
    let step = params.step as i64;
    let deltas = [-step, -step / 2, 0, step / 2, step];
    let entries: Vec<(String, ScoreRange)> = current
        .iter()
        .map(|(c, r)| (c.to_string(), r))
        .collect();

    let mut candidates: Vec<SideThresholds> = Vec::new();
    let push = |candidate: SideThresholds, candidates: &mut Vec<SideThresholds>| {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    for index in 0..entries.len() {
        for dmin in deltas {
            for dmax in deltas {
                let min = entries[index].1.min as i64 + dmin;
                let max = entries[index].1.max as i64 + dmax;
                if min < 0 || max > 100 || min >= max {
                    continue;
                }
                let mut candidate = entries.clone();
                candidate[index].1 = ScoreRange::new(min as u32, max as u32);
                push(candidate.into_iter().collect(), &mut candidates);
            }
        }
    }
    push(current.clone(), &mut candidates);

    candidates.truncate(params.candidate_cap);
    candidates
}

/// Accuracy of a candidate threshold map over the batch: re-classify
/// every record and compare against the ground-truth field, over records
/// where both sides of the comparison exist.
fn score(
    records: &[Record],
    thresholds: &QuestionThresholds,
    score_prefix: &str,
    actual_field: &str,
    question: &str,
) -> f64 {
    let mut correct = 0usize;
    let mut total = 0usize;
    for record in records {
        let Some(actual) = record.text(actual_field) else {
            continue;
        };
        let Some(predicted) = classify_record(record, thresholds, score_prefix).predicted else {
            continue;
        };
        total += 1;
        if normalize_answer(question, &predicted) == normalize_answer(question, actual) {
            correct += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}
