mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "defectlens",
    version,
    about = "Threshold-driven visual-defect classification and accuracy analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a record batch and write answer columns
    Classify {
        /// Path to the JSON record batch (array of flat objects)
        records: PathBuf,

        /// Custom JSON threshold config file
        #[arg(short, long = "thresholds", value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Predefined threshold preset: scratch, panel
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Question to classify under (default: first non-default in the config)
        #[arg(short, long)]
        question: Option<String>,

        /// Model columns to use: deployed or candidate
        #[arg(short, long, default_value = "deployed")]
        model: String,

        /// Ground-truth field name
        #[arg(long, default_value = "final_answer")]
        actual_field: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the classified batch to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Build a confusion matrix, optionally comparing against adjusted thresholds
    Matrix {
        /// Path to the JSON record batch
        records: PathBuf,

        /// Custom JSON threshold config file
        #[arg(short, long = "thresholds", value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Predefined threshold preset: scratch, panel
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Adjusted threshold config to compare against the original
        #[arg(short, long, value_name = "FILE")]
        adjusted: Option<PathBuf>,

        /// Question to classify under
        #[arg(short, long)]
        question: Option<String>,

        /// Model columns to use: deployed or candidate
        #[arg(short, long, default_value = "deployed")]
        model: String,

        /// Ground-truth field name
        #[arg(long, default_value = "final_answer")]
        actual_field: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Search for threshold boundaries that maximize accuracy
    Optimize {
        /// Path to the JSON record batch
        records: PathBuf,

        /// Custom JSON threshold config file
        #[arg(short, long = "thresholds", value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Predefined threshold preset: scratch, panel
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Question to optimize
        #[arg(short, long)]
        question: Option<String>,

        /// Optimize a single side (default: every side of the question)
        #[arg(short, long)]
        side: Option<String>,

        /// Boundary perturbation step
        #[arg(long, default_value_t = 10)]
        step: u32,

        /// Maximum candidates scored per side
        #[arg(long, default_value_t = 100)]
        candidate_cap: usize,

        /// Model columns to use: deployed or candidate
        #[arg(short, long, default_value = "deployed")]
        model: String,

        /// Ground-truth field name
        #[arg(long, default_value = "final_answer")]
        actual_field: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the optimized threshold config to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Manage and inspect threshold configs
    Thresholds {
        #[command(subcommand)]
        action: ThresholdsAction,
    },
}

#[derive(Subcommand)]
enum ThresholdsAction {
    /// List predefined threshold presets
    List,
    /// Print a preset or config file as JSON
    Show {
        /// Preset name or path to a JSON config file
        source: String,
    },
    /// Validate a config file and preview range repairs
    Validate {
        /// Path to a JSON threshold config file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classify {
            records,
            thresholds,
            preset,
            question,
            model,
            actual_field,
            output,
            out,
        } => commands::classify::run(
            records,
            thresholds,
            preset,
            question.as_deref(),
            &model,
            &actual_field,
            &output,
            out,
        ),
        Commands::Matrix {
            records,
            thresholds,
            preset,
            adjusted,
            question,
            model,
            actual_field,
            output,
        } => commands::matrix::run(
            records,
            thresholds,
            preset,
            adjusted,
            question.as_deref(),
            &model,
            &actual_field,
            &output,
        ),
        Commands::Optimize {
            records,
            thresholds,
            preset,
            question,
            side,
            step,
            candidate_cap,
            model,
            actual_field,
            output,
            out,
        } => commands::optimize::run(
            records,
            thresholds,
            preset,
            question.as_deref(),
            side.as_deref(),
            step,
            candidate_cap,
            &model,
            &actual_field,
            &output,
            out,
        ),
        Commands::Thresholds { action } => match action {
            ThresholdsAction::List => commands::thresholds::list(),
            ThresholdsAction::Show { source } => commands::thresholds::show(&source),
            ThresholdsAction::Validate { file } => commands::thresholds::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
