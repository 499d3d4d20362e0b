use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One side of an inspected object. The enum order is the canonical side
/// order used everywhere sides are iterated or displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    Back,
    Front,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Top,
        Side::Bottom,
        Side::Left,
        Side::Right,
        Side::Back,
        Side::Front,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
            Side::Back => "back",
            Side::Front => "front",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Side> {
        match s.trim().to_lowercase().as_str() {
            "top" => Some(Side::Top),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            "back" => Some(Side::Back),
            "front" => Some(Side::Front),
            _ => None,
        }
    }

    /// Name of the score field carrying this side's score, e.g.
    /// `back_score` or `new_back_score`.
    pub fn score_field(&self, prefix: &str) -> String {
        format!("{}{}_score", prefix, self.as_str())
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which model's answer/score columns to operate on. The deployed model
/// reads plain `<side>_score` columns and writes `cscan_answer`; the
/// candidate ("new") model reads `new_<side>_score` and writes
/// `new_cscan_answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Deployed,
    Candidate,
}

impl ModelKind {
    pub fn score_prefix(&self) -> &'static str {
        match self {
            ModelKind::Deployed => "",
            ModelKind::Candidate => "new_",
        }
    }

    pub fn answer_field(&self) -> &'static str {
        match self {
            ModelKind::Deployed => "cscan_answer",
            ModelKind::Candidate => "new_cscan_answer",
        }
    }

    pub fn contributing_field(&self) -> &'static str {
        match self {
            ModelKind::Deployed => "contributing_sides",
            ModelKind::Candidate => "new_contributing_sides",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Deployed => write!(f, "deployed"),
            ModelKind::Candidate => write!(f, "candidate"),
        }
    }
}

/// A single value in a flat record. Absence is a first-class state: a
/// `Null`, an empty/whitespace string and a NaN number all count as "no
/// data" rather than errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    /// Numeric view of the value. NaN and blank text map to `None`;
    /// numeric strings (common in exported CSV-derived batches) parse.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if !n.is_nan() => Some(*n),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            FieldValue::Null => None,
        }
    }

    /// Text view of the value. Blank strings and nulls map to `None`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Number(n) => n.is_nan(),
            FieldValue::Text(s) => s.trim().is_empty(),
        }
    }
}

/// One inspected object as a flat field map. Records arrive as rows of a
/// generated analysis table; the engine only interprets the handful of
/// fields it is asked about (`{prefix}{side}_score`, answer fields) and
/// carries the rest through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn set_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.set(field, FieldValue::Text(value.into()));
    }

    pub fn set_number(&mut self, field: impl Into<String>, value: f64) {
        self.set(field, FieldValue::Number(value));
    }

    /// This side's score under the given model prefix, or `None` when the
    /// field is absent, blank or NaN.
    pub fn score(&self, prefix: &str, side: Side) -> Option<f64> {
        self.get(&side.score_field(prefix))
            .and_then(FieldValue::as_number)
    }

    /// Non-blank text content of a field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn is_blank(&self, field: &str) -> bool {
        self.get(field).map(FieldValue::is_blank).unwrap_or(true)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_canonical_order() {
        let names: Vec<&str> = Side::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["top", "bottom", "left", "right", "back", "front"]);
    }

    #[test]
    fn test_side_from_str_loose() {
        assert_eq!(Side::from_str_loose("  Back "), Some(Side::Back));
        assert_eq!(Side::from_str_loose("FRONT"), Some(Side::Front));
        assert_eq!(Side::from_str_loose("side"), None);
    }

    #[test]
    fn test_score_field_names() {
        assert_eq!(Side::Back.score_field(""), "back_score");
        assert_eq!(Side::Left.score_field("new_"), "new_left_score");
    }

    #[test]
    fn test_record_score_parsing() {
        let mut rec = Record::new();
        rec.set_number("back_score", 87.5);
        rec.set_text("front_score", "42");
        rec.set_text("top_score", "   ");
        rec.set("left_score", FieldValue::Null);
        rec.set_number("right_score", f64::NAN);

        assert_eq!(rec.score("", Side::Back), Some(87.5));
        assert_eq!(rec.score("", Side::Front), Some(42.0));
        assert_eq!(rec.score("", Side::Top), None);
        assert_eq!(rec.score("", Side::Left), None);
        assert_eq!(rec.score("", Side::Right), None);
        assert_eq!(rec.score("", Side::Bottom), None);
    }

    #[test]
    fn test_record_text_blankness() {
        let mut rec = Record::new();
        rec.set_text("final_answer", "Minor Scratch");
        rec.set_text("cscan_answer", "");

        assert_eq!(rec.text("final_answer"), Some("Minor Scratch"));
        assert_eq!(rec.text("cscan_answer"), None);
        assert!(rec.is_blank("cscan_answer"));
        assert!(rec.is_blank("missing_field"));
    }

    #[test]
    fn test_record_json_round_trip() {
        let json = r#"{"pdd_txn_id": "txn-1", "back_score": 91.2, "final_answer": "major scratch", "top_score": null}"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(rec.text("pdd_txn_id"), Some("txn-1"));
        assert_eq!(rec.score("", Side::Back), Some(91.2));
        assert_eq!(rec.score("", Side::Top), None);

        let back: Record = serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(back, rec);
    }
}
