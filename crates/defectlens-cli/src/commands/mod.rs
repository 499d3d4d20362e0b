pub mod classify;
pub mod matrix;
pub mod optimize;
pub mod thresholds;

use defectlens_core::config::builtin;
use defectlens_core::config::schema::ThresholdConfig;
use defectlens_core::error::EngineError;
use defectlens_core::model::{ModelKind, Record, Side};
use std::path::Path;

/// Resolve the threshold config: an explicit file wins, otherwise the
/// named preset, otherwise the default "scratch" preset.
pub fn load_config_arg(
    thresholds: Option<&Path>,
    preset: Option<&str>,
) -> Result<ThresholdConfig, EngineError> {
    match thresholds {
        Some(path) => defectlens_core::config::load_config(path),
        None => builtin::load_preset(preset.unwrap_or("scratch")),
    }
}

/// Load a record batch from a JSON array file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, EngineError> {
    let bytes = std::fs::read(path).map_err(|e| EngineError::RecordLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| EngineError::RecordLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a classified batch back out as pretty JSON.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn parse_model(name: &str) -> Result<ModelKind, EngineError> {
    match name.trim().to_lowercase().as_str() {
        "deployed" => Ok(ModelKind::Deployed),
        "candidate" | "new" => Ok(ModelKind::Candidate),
        other => Err(EngineError::ConfigInvalid(format!(
            "unknown model '{}' (expected 'deployed' or 'candidate')",
            other
        ))),
    }
}

pub fn parse_side(name: &str) -> Result<Side, EngineError> {
    Side::from_str_loose(name).ok_or_else(|| EngineError::UnknownSide(name.to_string()))
}
