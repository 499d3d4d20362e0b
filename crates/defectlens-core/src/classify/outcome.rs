use crate::model::Side;
use serde::{Deserialize, Serialize};

/// Classification outcome for a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// The resolved category, or `None` when no side's score fell into
    /// any range.
    pub predicted: Option<String>,
    /// Sides whose per-side category equals the predicted category, in
    /// canonical side order. Empty when the predicted category is the
    /// least severe one.
    pub contributing_sides: Vec<Side>,
}

impl RecordOutcome {
    pub fn unclassified() -> RecordOutcome {
        RecordOutcome {
            predicted: None,
            contributing_sides: Vec::new(),
        }
    }

    /// Comma-joined side names for the answer columns, empty string when
    /// no sides contributed.
    pub fn contributing_joined(&self) -> String {
        self.contributing_sides
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Aggregate counts for a classified batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Total records processed.
    pub total: usize,
    /// Records that received a predicted category.
    pub classified: usize,
    /// Records where no side matched any range.
    pub unclassified: usize,
    /// Records whose previous answer (if any) differs from the new one.
    pub changed: usize,
    /// Accuracy (percent) of the new answers against the ground-truth
    /// field, over records where both are present. 0 when no such pairs.
    pub accuracy: f64,
}
