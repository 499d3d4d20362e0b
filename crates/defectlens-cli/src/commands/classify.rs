use defectlens_core::classify_records;
use defectlens_core::error::EngineError;
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::{load_config_arg, load_records, parse_model, write_records};
use crate::output;

#[derive(Serialize)]
struct ClassifyReport<'a> {
    question: &'a str,
    outcome: &'a defectlens_core::classify::outcome::BatchOutcome,
    records: &'a [defectlens_core::model::Record],
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    records_file: PathBuf,
    thresholds: Option<PathBuf>,
    preset: Option<String>,
    question: Option<&str>,
    model: &str,
    actual_field: &str,
    output_format: &str,
    out: Option<PathBuf>,
) -> Result<(), EngineError> {
    let config = load_config_arg(thresholds.as_deref(), preset.as_deref())?;
    let model = parse_model(model)?;
    let mut records = load_records(&records_file)?;

    let result = classify_records(&mut records, &config, question, model, actual_field)?;

    match output_format {
        "json" => output::json::print(&ClassifyReport {
            question: &result.question,
            outcome: &result.outcome,
            records: &records,
        })?,
        _ => output::table::print_batch(&result.question, &result.outcome),
    }

    if let Some(path) = out {
        write_records(&path, &records)?;
        eprintln!("Wrote {} classified records to {}", records.len(), path.display());
    }

    Ok(())
}
