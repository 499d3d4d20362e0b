use defectlens_core::config::resolve_question;
use defectlens_core::error::EngineError;
use defectlens_core::tweak::{optimize, OptimizerParams};
use std::path::PathBuf;

use crate::commands::{load_config_arg, load_records, parse_model, parse_side};
use crate::output;

#[allow(clippy::too_many_arguments)]
pub fn run(
    records_file: PathBuf,
    thresholds: Option<PathBuf>,
    preset: Option<String>,
    question: Option<&str>,
    side: Option<&str>,
    step: u32,
    candidate_cap: usize,
    model: &str,
    actual_field: &str,
    output_format: &str,
    out: Option<PathBuf>,
) -> Result<(), EngineError> {
    let config = load_config_arg(thresholds.as_deref(), preset.as_deref())?;
    let model = parse_model(model)?;
    let records = load_records(&records_file)?;

    let (question, _) = resolve_question(&config, question)?;
    let target_side = side.map(parse_side).transpose()?;
    let params = OptimizerParams {
        step,
        candidate_cap,
    };

    let outcome = optimize(
        &records,
        &config,
        &question,
        model.score_prefix(),
        actual_field,
        target_side,
        &params,
    )?;

    match output_format {
        "json" => output::json::print(&outcome)?,
        _ => output::table::print_optimized(&question, &outcome),
    }

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&outcome.config)?;
        std::fs::write(&path, json)?;
        eprintln!("Wrote optimized thresholds to {}", path.display());
    }

    Ok(())
}
