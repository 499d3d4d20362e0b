pub mod classify;
pub mod config;
pub mod error;
pub mod matrix;
pub mod model;
pub mod tweak;

use classify::outcome::BatchOutcome;
use config::schema::ThresholdConfig;
use error::EngineError;
use matrix::{build_matrix, ConfusionMatrix};
use model::{ModelKind, Record};
use serde::{Deserialize, Serialize};

/// Result of classifying a record batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchClassification {
    /// The question the batch was classified under.
    pub question: String,
    pub outcome: BatchOutcome,
}

/// Main API entry point: classify a record batch in place against a
/// threshold config.
///
/// Resolves the question (named, or auto-discovered as the first
/// non-default entry), classifies every record, and writes the model's
/// answer and contributing-sides fields back into the records.
pub fn classify_records(
    records: &mut [Record],
    config: &ThresholdConfig,
    question: Option<&str>,
    model: ModelKind,
    actual_field: &str,
) -> Result<BatchClassification, EngineError> {
    let (question, thresholds) = config::resolve_question(config, question)?;
    let outcome = classify::classify_batch(records, thresholds, model, actual_field);
    Ok(BatchClassification { question, outcome })
}

/// Reference-vs-adjusted comparison over one record batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdComparison {
    pub question: String,
    /// Matrix under the original thresholds.
    pub reference: ConfusionMatrix,
    /// Matrix under the adjusted thresholds.
    pub adjusted: ConfusionMatrix,
    /// Adjusted accuracy minus reference accuracy.
    pub accuracy_delta: f64,
    /// Records whose predicted answer differs between the two configs.
    pub changed_records: usize,
}

/// Classify the same batch under the original and an adjusted config and
/// build both confusion matrices over a shared label axis.
///
/// Both matrices take their label order from the ORIGINAL config's
/// category order, so the two stay structurally comparable even when the
/// adjustment changed category boundaries. The caller's records are not
/// modified.
pub fn compare_thresholds(
    records: &[Record],
    original: &ThresholdConfig,
    adjusted: &ThresholdConfig,
    question: Option<&str>,
    model: ModelKind,
    actual_field: &str,
) -> Result<ThresholdComparison, EngineError> {
    let (question, original_thresholds) = config::resolve_question(original, question)?;
    let adjusted_thresholds = adjusted
        .resolve(&question)
        .ok_or_else(|| EngineError::QuestionNotFound(question.clone()))?;
    let canonical_order = original_thresholds.category_order();

    let mut reference_records = records.to_vec();
    classify::classify_batch(&mut reference_records, original_thresholds, model, actual_field);
    let reference = build_matrix(
        &reference_records,
        model.answer_field(),
        actual_field,
        &canonical_order,
        &question,
    );

    let mut adjusted_records = records.to_vec();
    classify::classify_batch(&mut adjusted_records, adjusted_thresholds, model, actual_field);
    let adjusted_matrix = build_matrix(
        &adjusted_records,
        model.answer_field(),
        actual_field,
        &canonical_order,
        &question,
    );

    let changed_records = reference_records
        .iter()
        .zip(adjusted_records.iter())
        .filter(|(before, after)| {
            let before = before
                .text(model.answer_field())
                .map(|l| matrix::normalize_answer(&question, l));
            let after = after
                .text(model.answer_field())
                .map(|l| matrix::normalize_answer(&question, l));
            before != after
        })
        .count();

    let accuracy_delta = adjusted_matrix.accuracy - reference.accuracy;
    Ok(ThresholdComparison {
        question,
        reference,
        adjusted: adjusted_matrix,
        accuracy_delta,
        changed_records,
    })
}
