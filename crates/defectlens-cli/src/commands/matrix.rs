use defectlens_core::error::EngineError;
use defectlens_core::matrix::build_matrix;
use defectlens_core::{classify_records, compare_thresholds};
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::{load_config_arg, load_records, parse_model};
use crate::output;

#[derive(Serialize)]
struct MatrixReport<'a> {
    question: &'a str,
    matrix: &'a defectlens_core::matrix::ConfusionMatrix,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    records_file: PathBuf,
    thresholds: Option<PathBuf>,
    preset: Option<String>,
    adjusted: Option<PathBuf>,
    question: Option<&str>,
    model: &str,
    actual_field: &str,
    output_format: &str,
) -> Result<(), EngineError> {
    let config = load_config_arg(thresholds.as_deref(), preset.as_deref())?;
    let model = parse_model(model)?;
    let records = load_records(&records_file)?;

    // With an adjusted config, classify under both and compare; the
    // matrices share the original config's label axis.
    if let Some(adjusted_path) = adjusted {
        let adjusted_config = defectlens_core::config::load_config(&adjusted_path)?;
        let comparison = compare_thresholds(
            &records,
            &config,
            &adjusted_config,
            question,
            model,
            actual_field,
        )?;
        match output_format {
            "json" => output::json::print(&comparison)?,
            _ => output::table::print_comparison(&comparison),
        }
        return Ok(());
    }

    let mut records = records;
    let result = classify_records(&mut records, &config, question, model, actual_field)?;
    let canonical_order = defectlens_core::config::resolve_question(&config, Some(&result.question))?
        .1
        .category_order();
    let matrix = build_matrix(
        &records,
        model.answer_field(),
        actual_field,
        &canonical_order,
        &result.question,
    );

    match output_format {
        "json" => output::json::print(&MatrixReport {
            question: &result.question,
            matrix: &matrix,
        })?,
        _ => output::table::print_matrix(&result.question, &matrix),
    }

    Ok(())
}
