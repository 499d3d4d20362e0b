use defectlens_core::config::{builtin, load_config, validate_config};
use defectlens_core::error::EngineError;
use defectlens_core::tweak::repair_side;
use std::path::Path;

use crate::output;

pub fn list() -> Result<(), EngineError> {
    println!("Available threshold presets:\n");
    for name in builtin::PRESETS {
        let config = builtin::load_preset(name)?;
        for (question, thresholds) in config.questions() {
            let sides: Vec<String> = thresholds.side_names().map(|s| s.to_string()).collect();
            println!(
                "  {:<8} {} ({} categories, sides: {})",
                name,
                question,
                thresholds.category_order().len(),
                sides.join(", ")
            );
        }
        println!();
    }
    Ok(())
}

pub fn show(source: &str) -> Result<(), EngineError> {
    let config = if builtin::PRESETS.contains(&source) {
        builtin::load_preset(source)?
    } else {
        load_config(Path::new(source))?
    };
    output::json::print(&config)
}

pub fn validate(file: &Path) -> Result<(), EngineError> {
    let config = load_config(file)?;
    validate_config(&config)?;

    let mut repairs = 0;
    for (question, thresholds) in config.questions() {
        for (side, side_thresholds) in thresholds.sides() {
            let repaired = repair_side(side_thresholds);
            if &repaired != side_thresholds {
                repairs += 1;
                println!("{} / {}: ranges need repair", question, side);
                for (category, range) in repaired.iter() {
                    let marker = match side_thresholds.get(category) {
                        Some(original) if original == range => "  ",
                        _ => "->",
                    };
                    println!("  {} {:<24} {}", marker, category, range);
                }
            }
        }
    }

    if repairs == 0 {
        println!("{}: OK, all ranges contiguous over [0, 100]", file.display());
    } else {
        println!(
            "\n{}: {} side(s) would be repaired before use",
            file.display(),
            repairs
        );
    }
    Ok(())
}
