use crate::classify::normalize_label;
use crate::model::Record;
use serde::{Deserialize, Serialize};

/// Question whose answer labels carry a merged alias.
const PANEL_QUESTION: &str = "physicalconditionpanel";
const PANEL_ALIAS: &str = "glass panel damaged";
const PANEL_CANONICAL: &str = "cracked or broken panel";

/// Normalize an answer label in the context of a question. On top of the
/// plain trim/lowercase, the panel question folds the legacy
/// "glass panel damaged" label into "cracked or broken panel"; every
/// other question passes labels through unchanged.
pub fn normalize_answer(question: &str, label: &str) -> String {
    let normalized = normalize_label(label);
    if question.trim().to_lowercase() == PANEL_QUESTION && normalized == PANEL_ALIAS {
        return PANEL_CANONICAL.to_string();
    }
    normalized
}

/// A confusion matrix over a record batch. Rows are actual labels,
/// columns are predicted labels, both over the same `labels` axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Label axis, shared by rows and columns.
    pub labels: Vec<String>,
    /// `matrix[actual][predicted]` counts.
    pub matrix: Vec<Vec<usize>>,
    /// Diagonal count.
    pub correct: usize,
    /// Records with both predicted and actual labels present.
    pub total: usize,
    /// `correct / total * 100`, 0 when total is 0.
    pub accuracy: f64,
    /// Per-label precision (percent), 0 when the label was never predicted.
    pub precision: Vec<f64>,
    /// Per-label recall (percent), 0 when the label never occurs as actual.
    pub recall: Vec<f64>,
    /// Indices (into the input batch) of the records behind each cell,
    /// for drill-down.
    pub cell_records: Vec<Vec<Vec<usize>>>,
}

impl ConfusionMatrix {
    pub fn empty() -> ConfusionMatrix {
        ConfusionMatrix {
            labels: Vec::new(),
            matrix: Vec::new(),
            correct: 0,
            total: 0,
            accuracy: 0.0,
            precision: Vec::new(),
            recall: Vec::new(),
            cell_records: Vec::new(),
        }
    }
}

/// Build a confusion matrix from a record batch.
///
/// Records missing either field are excluded. The label axis starts from
/// `canonical_order` (the original config's category order) filtered to
/// labels observed in the data, then any observed label outside the
/// canonical order is appended alphabetically. Keeping the axis anchored
/// to the original config makes reference and adjusted matrices
/// structurally comparable.
pub fn build_matrix(
    records: &[Record],
    predicted_field: &str,
    actual_field: &str,
    canonical_order: &[String],
    question: &str,
) -> ConfusionMatrix {
    let mut pairs: Vec<(usize, String, String)> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let (Some(predicted), Some(actual)) =
            (record.text(predicted_field), record.text(actual_field))
        else {
            continue;
        };
        pairs.push((
            index,
            normalize_answer(question, predicted),
            normalize_answer(question, actual),
        ));
    }

    if pairs.is_empty() {
        return ConfusionMatrix::empty();
    }

    let mut observed: Vec<String> = Vec::new();
    for (_, predicted, actual) in &pairs {
        if !observed.contains(predicted) {
            observed.push(predicted.clone());
        }
        if !observed.contains(actual) {
            observed.push(actual.clone());
        }
    }

    let mut labels: Vec<String> = canonical_order
        .iter()
        .filter(|c| observed.contains(c))
        .cloned()
        .collect();
    let mut extra: Vec<String> = observed
        .iter()
        .filter(|o| !labels.contains(o))
        .cloned()
        .collect();
    extra.sort();
    labels.extend(extra);

    let n = labels.len();
    let mut matrix = vec![vec![0usize; n]; n];
    let mut cell_records = vec![vec![Vec::new(); n]; n];
    let mut correct = 0usize;

    for (index, predicted, actual) in &pairs {
        let (Some(row), Some(col)) = (
            labels.iter().position(|l| l == actual),
            labels.iter().position(|l| l == predicted),
        ) else {
            continue;
        };
        matrix[row][col] += 1;
        cell_records[row][col].push(*index);
        if row == col {
            correct += 1;
        }
    }

    let total = pairs.len();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    };

    let mut precision = Vec::with_capacity(n);
    let mut recall = Vec::with_capacity(n);
    for i in 0..n {
        let predicted_as: usize = (0..n).map(|row| matrix[row][i]).sum();
        let actual_is: usize = matrix[i].iter().sum();
        let diagonal = matrix[i][i];
        precision.push(if predicted_as == 0 {
            0.0
        } else {
            diagonal as f64 / predicted_as as f64 * 100.0
        });
        recall.push(if actual_is == 0 {
            0.0
        } else {
            diagonal as f64 / actual_is as f64 * 100.0
        });
    }

    ConfusionMatrix {
        labels,
        matrix,
        correct,
        total,
        accuracy,
        precision,
        recall,
        cell_records,
    }
}
