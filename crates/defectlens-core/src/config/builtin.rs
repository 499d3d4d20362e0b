use crate::config::schema::ThresholdConfig;
use crate::error::EngineError;

const SCRATCH_JSON: &str = include_str!("../../../../thresholds/scratch.json");
const PANEL_JSON: &str = include_str!("../../../../thresholds/panel.json");

/// Available predefined threshold presets.
pub const PRESETS: &[&str] = &["scratch", "panel"];

/// Load a predefined threshold config by name.
pub fn load_preset(name: &str) -> Result<ThresholdConfig, EngineError> {
    let json = match name {
        "scratch" => SCRATCH_JSON,
        "panel" => PANEL_JSON,
        _ => {
            return Err(EngineError::ConfigInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let config: ThresholdConfig = serde_json::from_str(json)?;
    crate::config::validate_config(&config)?;
    Ok(config)
}
