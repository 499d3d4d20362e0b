pub mod engine;
pub mod outcome;
pub mod severity;

pub use engine::{batch_accuracy, classify_batch, classify_record, classify_score};
pub use outcome::{BatchOutcome, RecordOutcome};
pub use severity::{least_severe, severity_order};

/// Label normalization applied before comparing predicted vs actual
/// answers: trim and lowercase.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}
