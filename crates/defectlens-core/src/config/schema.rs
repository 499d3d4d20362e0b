use crate::model::Side;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Half-open score range `[min, max)` on the 0..=100 score scale.
/// Serialized as a two-element array, matching the threshold document
/// format (`"minor scratch": [65, 80]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct ScoreRange {
    pub min: u32,
    pub max: u32,
}

impl ScoreRange {
    pub fn new(min: u32, max: u32) -> ScoreRange {
        ScoreRange { min, max }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.min as f64 <= score && score < self.max as f64
    }
}

impl From<(u32, u32)> for ScoreRange {
    fn from((min, max): (u32, u32)) -> ScoreRange {
        ScoreRange { min, max }
    }
}

impl From<ScoreRange> for (u32, u32) {
    fn from(r: ScoreRange) -> (u32, u32) {
        (r.min, r.max)
    }
}

impl fmt::Display for ScoreRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Ordered category -> range map for one side.
///
/// Category insertion order is significant: it is the canonical display
/// order and the severity tie-break order, so this is a list of pairs
/// rather than a hash map. Deserialization walks the JSON object in
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideThresholds {
    entries: Vec<(String, ScoreRange)>,
}

impl SideThresholds {
    pub fn new() -> SideThresholds {
        SideThresholds::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<ScoreRange> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, r)| *r)
    }

    /// Replace an existing category's range in place, or append a new
    /// category at the end.
    pub fn set(&mut self, category: impl Into<String>, range: ScoreRange) {
        let category = category.into();
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, r)) => *r = range,
            None => self.entries.push((category, range)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ScoreRange)> {
        self.entries.iter().map(|(c, r)| (c.as_str(), *r))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }
}

impl FromIterator<(String, ScoreRange)> for SideThresholds {
    fn from_iter<I: IntoIterator<Item = (String, ScoreRange)>>(iter: I) -> SideThresholds {
        let mut st = SideThresholds::new();
        for (category, range) in iter {
            st.set(category, range);
        }
        st
    }
}

impl Serialize for SideThresholds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, range) in &self.entries {
            map.serialize_entry(category, range)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SideThresholds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<SideThresholds, D::Error> {
        struct SideVisitor;

        impl<'de> Visitor<'de> for SideVisitor {
            type Value = SideThresholds;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category name to [min, max] range")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SideThresholds, A::Error> {
                let mut st = SideThresholds::new();
                while let Some((category, range)) = access.next_entry::<String, ScoreRange>()? {
                    st.set(category, range);
                }
                Ok(st)
            }
        }

        deserializer.deserialize_map(SideVisitor)
    }
}

/// Per-side thresholds for one question. Sides keep their document
/// order; an unrecognized side name is a hard error at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionThresholds {
    sides: Vec<(Side, SideThresholds)>,
}

impl QuestionThresholds {
    pub fn new() -> QuestionThresholds {
        QuestionThresholds::default()
    }

    pub fn len(&self) -> usize {
        self.sides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    pub fn side(&self, side: Side) -> Option<&SideThresholds> {
        self.sides.iter().find(|(s, _)| *s == side).map(|(_, t)| t)
    }

    pub fn set_side(&mut self, side: Side, thresholds: SideThresholds) {
        match self.sides.iter_mut().find(|(s, _)| *s == side) {
            Some((_, t)) => *t = thresholds,
            None => self.sides.push((side, thresholds)),
        }
    }

    pub fn sides(&self) -> impl Iterator<Item = (Side, &SideThresholds)> {
        self.sides.iter().map(|(s, t)| (*s, t))
    }

    pub fn side_names(&self) -> impl Iterator<Item = Side> + '_ {
        self.sides.iter().map(|(s, _)| *s)
    }

    /// Canonical display order for this question's categories: the first
    /// side's category order, lowercased and trimmed. All sides are
    /// expected to share the same order, so the first one stands for all.
    pub fn category_order(&self) -> Vec<String> {
        match self.sides.first() {
            Some((_, first)) => first
                .categories()
                .map(|c| c.trim().to_lowercase())
                .collect(),
            None => Vec::new(),
        }
    }
}

impl FromIterator<(Side, SideThresholds)> for QuestionThresholds {
    fn from_iter<I: IntoIterator<Item = (Side, SideThresholds)>>(iter: I) -> QuestionThresholds {
        let mut qt = QuestionThresholds::new();
        for (side, thresholds) in iter {
            qt.set_side(side, thresholds);
        }
        qt
    }
}

impl Serialize for QuestionThresholds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sides.len()))?;
        for (side, thresholds) in &self.sides {
            map.serialize_entry(side.as_str(), thresholds)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QuestionThresholds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<QuestionThresholds, D::Error> {
        struct QuestionVisitor;

        impl<'de> Visitor<'de> for QuestionVisitor {
            type Value = QuestionThresholds;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of side name to category thresholds")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<QuestionThresholds, A::Error> {
                let mut qt = QuestionThresholds::new();
                while let Some((name, thresholds)) =
                    access.next_entry::<String, SideThresholds>()?
                {
                    let side = Side::from_str_loose(&name).ok_or_else(|| {
                        de::Error::custom(format!(
                            "unknown side '{}' (expected one of: top, bottom, left, right, back, front)",
                            name
                        ))
                    })?;
                    qt.set_side(side, thresholds);
                }
                Ok(qt)
            }
        }

        deserializer.deserialize_map(QuestionVisitor)
    }
}

/// The reserved question key holding fallback thresholds.
pub const DEFAULT_QUESTION: &str = "default";

/// The full threshold document: question -> side -> category -> range.
/// Question order follows the document; the `"default"` entry is a
/// fallback, never "the" question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdConfig {
    questions: Vec<(String, QuestionThresholds)>,
}

impl ThresholdConfig {
    pub fn new() -> ThresholdConfig {
        ThresholdConfig::default()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, name: &str) -> Option<&QuestionThresholds> {
        self.questions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, q)| q)
    }

    pub fn set_question(&mut self, name: impl Into<String>, thresholds: QuestionThresholds) {
        let name = name.into();
        match self.questions.iter_mut().find(|(n, _)| *n == name) {
            Some((_, q)) => *q = thresholds,
            None => self.questions.push((name, thresholds)),
        }
    }

    pub fn questions(&self) -> impl Iterator<Item = (&str, &QuestionThresholds)> {
        self.questions.iter().map(|(n, q)| (n.as_str(), q))
    }

    /// Thresholds for a question, falling back to the `"default"` entry
    /// when the question is absent.
    pub fn resolve(&self, name: &str) -> Option<&QuestionThresholds> {
        self.question(name)
            .or_else(|| self.question(DEFAULT_QUESTION))
    }

    /// First non-default question in document order, used when the
    /// caller does not name one.
    pub fn discover_question(&self) -> Option<&str> {
        self.questions
            .iter()
            .map(|(n, _)| n.as_str())
            .find(|n| *n != DEFAULT_QUESTION)
    }
}

impl FromIterator<(String, QuestionThresholds)> for ThresholdConfig {
    fn from_iter<I: IntoIterator<Item = (String, QuestionThresholds)>>(iter: I) -> ThresholdConfig {
        let mut cfg = ThresholdConfig::new();
        for (name, thresholds) in iter {
            cfg.set_question(name, thresholds);
        }
        cfg
    }
}

impl Serialize for ThresholdConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.questions.len()))?;
        for (name, thresholds) in &self.questions {
            map.serialize_entry(name, thresholds)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ThresholdConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<ThresholdConfig, D::Error> {
        struct ConfigVisitor;

        impl<'de> Visitor<'de> for ConfigVisitor {
            type Value = ThresholdConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of question name to per-side thresholds")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ThresholdConfig, A::Error> {
                let mut cfg = ThresholdConfig::new();
                while let Some((name, thresholds)) =
                    access.next_entry::<String, QuestionThresholds>()?
                {
                    cfg.set_question(name, thresholds);
                }
                Ok(cfg)
            }
        }

        deserializer.deserialize_map(ConfigVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_json() -> &'static str {
        r#"{
            "physicalConditionScratch": {
                "back": {
                    "no scratches": [0, 50],
                    "minor scratch": [50, 80],
                    "major scratch": [80, 100]
                }
            },
            "default": {
                "back": { "ok": [0, 100] }
            }
        }"#
    }

    #[test]
    fn test_parse_preserves_category_order() {
        let cfg: ThresholdConfig = serde_json::from_str(scratch_json()).unwrap();
        let q = cfg.question("physicalConditionScratch").unwrap();
        let back = q.side(Side::Back).unwrap();
        let cats: Vec<&str> = back.categories().collect();
        assert_eq!(cats, vec!["no scratches", "minor scratch", "major scratch"]);
    }

    #[test]
    fn test_serialize_round_trip_keeps_order() {
        let cfg: ThresholdConfig = serde_json::from_str(scratch_json()).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        let again: ThresholdConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, again);
    }

    #[test]
    fn test_unknown_side_rejected() {
        let json = r#"{ "q": { "middle": { "ok": [0, 100] } } }"#;
        let result: Result<ThresholdConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown side"));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let cfg: ThresholdConfig = serde_json::from_str(scratch_json()).unwrap();
        assert!(cfg.resolve("physicalConditionScratch").is_some());
        let fallback = cfg.resolve("somethingElse").unwrap();
        assert_eq!(fallback.side(Side::Back).unwrap().len(), 1);
    }

    #[test]
    fn test_discover_skips_default() {
        let json = r#"{
            "default": { "back": { "ok": [0, 100] } },
            "physicalConditionPanel": { "back": { "ok": [0, 100] } }
        }"#;
        let cfg: ThresholdConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.discover_question(), Some("physicalConditionPanel"));
    }

    #[test]
    fn test_range_contains_half_open() {
        let r = ScoreRange::new(50, 80);
        assert!(r.contains(50.0));
        assert!(r.contains(79.999));
        assert!(!r.contains(80.0));
        assert!(!r.contains(49.999));
        assert!(!r.contains(f64::NAN));
    }

    #[test]
    fn test_category_order_lowercases() {
        let json = r#"{ "q": { "back": { "No Scratches": [0, 50], "Major Scratch": [50, 100] } } }"#;
        let cfg: ThresholdConfig = serde_json::from_str(json).unwrap();
        let order = cfg.question("q").unwrap().category_order();
        assert_eq!(order, vec!["no scratches", "major scratch"]);
    }
}
