pub mod builtin;
pub mod schema;

use crate::error::EngineError;
use schema::{QuestionThresholds, ThresholdConfig, DEFAULT_QUESTION};
use std::path::Path;

/// Load a threshold config from a JSON file.
pub fn load_config(path: &Path) -> Result<ThresholdConfig, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config = parse_config(&content, path)?;
    tracing::debug!(path = %path.display(), questions = config.questions().count(), "loaded threshold config");
    Ok(config)
}

/// Parse a threshold config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<ThresholdConfig, EngineError> {
    let config: ThresholdConfig =
        serde_json::from_str(json).map_err(|e| EngineError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a threshold config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ThresholdConfig, EngineError> {
    let config: ThresholdConfig = serde_json::from_str(json).map_err(EngineError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a threshold config is structurally usable. Range bounds
/// are not checked here: out-of-order or gapped ranges are the threshold
/// repair pass's job, not a load failure.
pub fn validate_config(config: &ThresholdConfig) -> Result<(), EngineError> {
    if config.is_empty() {
        return Err(EngineError::ConfigInvalid(
            "config must define at least one question".into(),
        ));
    }
    for (question, thresholds) in config.questions() {
        if thresholds.is_empty() {
            return Err(EngineError::ConfigInvalid(format!(
                "question '{}' defines no sides",
                question
            )));
        }
        for (side, side_thresholds) in thresholds.sides() {
            if side_thresholds.is_empty() {
                return Err(EngineError::ConfigInvalid(format!(
                    "question '{}' side '{}' defines no categories",
                    question, side
                )));
            }
        }
    }
    Ok(())
}

/// Resolve which question to operate on. A named question must exist (or
/// fall back to the `"default"` entry); with no name given, the first
/// non-default question in document order is used.
pub fn resolve_question<'a>(
    config: &'a ThresholdConfig,
    name: Option<&str>,
) -> Result<(String, &'a QuestionThresholds), EngineError> {
    match name {
        Some(name) => {
            let thresholds = config
                .resolve(name)
                .ok_or_else(|| EngineError::QuestionNotFound(name.to_string()))?;
            Ok((name.to_string(), thresholds))
        }
        None => {
            let name = config
                .discover_question()
                .or_else(|| config.question(DEFAULT_QUESTION).map(|_| DEFAULT_QUESTION))
                .ok_or_else(|| {
                    EngineError::ConfigInvalid("config defines no questions".into())
                })?;
            let thresholds = config.resolve(name).ok_or_else(|| {
                EngineError::QuestionNotFound(name.to_string())
            })?;
            Ok((name.to_string(), thresholds))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Side;
    use schema::{ScoreRange, SideThresholds};

    fn minimal_config() -> ThresholdConfig {
        let mut side = SideThresholds::new();
        side.set("ok", ScoreRange::new(0, 100));
        let mut q = QuestionThresholds::new();
        q.set_side(Side::Back, side);
        let mut cfg = ThresholdConfig::new();
        cfg.set_question("physicalConditionScratch", q.clone());
        cfg.set_question(DEFAULT_QUESTION, q);
        cfg
    }

    #[test]
    fn test_validate_rejects_empty_config() {
        assert!(validate_config(&ThresholdConfig::new()).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_side() {
        let mut q = QuestionThresholds::new();
        q.set_side(Side::Back, SideThresholds::new());
        let mut cfg = ThresholdConfig::new();
        cfg.set_question("q", q);
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_resolve_named_question() {
        let cfg = minimal_config();
        let (name, _) = resolve_question(&cfg, Some("physicalConditionScratch")).unwrap();
        assert_eq!(name, "physicalConditionScratch");
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        let cfg = minimal_config();
        let (name, thresholds) = resolve_question(&cfg, Some("physicalConditionDent")).unwrap();
        assert_eq!(name, "physicalConditionDent");
        assert!(thresholds.side(Side::Back).is_some());
    }

    #[test]
    fn test_resolve_unknown_without_default_errors() {
        let mut side = SideThresholds::new();
        side.set("ok", ScoreRange::new(0, 100));
        let mut q = QuestionThresholds::new();
        q.set_side(Side::Back, side);
        let mut cfg = ThresholdConfig::new();
        cfg.set_question("onlyQuestion", q);

        let err = resolve_question(&cfg, Some("other")).unwrap_err();
        assert!(matches!(err, EngineError::QuestionNotFound(_)));
    }

    #[test]
    fn test_resolve_discovers_first_non_default() {
        let cfg = minimal_config();
        let (name, _) = resolve_question(&cfg, None).unwrap();
        assert_eq!(name, "physicalConditionScratch");
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_config_str("{not json").unwrap_err();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
