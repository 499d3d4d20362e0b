use defectlens_core::classify::outcome::BatchOutcome;
use defectlens_core::matrix::ConfusionMatrix;
use defectlens_core::tweak::OptimizeOutcome;
use defectlens_core::ThresholdComparison;

pub fn print_batch(question: &str, outcome: &BatchOutcome) {
    println!("=== Classification: {} ===\n", question);
    println!("  Records:      {}", outcome.total);
    println!("  Classified:   {}", outcome.classified);
    println!("  Unclassified: {}", outcome.unclassified);
    println!("  Changed:      {}", outcome.changed);
    println!("  Accuracy:     {:.1}%", outcome.accuracy);
}

pub fn print_matrix(question: &str, matrix: &ConfusionMatrix) {
    println!("=== Confusion matrix: {} ===\n", question);

    if matrix.total == 0 {
        println!("  No records with both predicted and actual answers.");
        return;
    }

    println!(
        "  Accuracy: {:.1}% ({}/{})\n",
        matrix.accuracy, matrix.correct, matrix.total
    );

    let label_width = matrix
        .labels
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(6)
        .max("actual".len());
    let cell_width = matrix.labels.iter().map(|l| l.len()).max().unwrap_or(6);

    // Header row: predicted labels as columns.
    print!("  {:<width$}", "actual", width = label_width + 2);
    for label in &matrix.labels {
        print!("  {:<width$}", label, width = cell_width);
    }
    println!();

    for (row, label) in matrix.labels.iter().enumerate() {
        print!("  {:<width$}", label, width = label_width + 2);
        for col in 0..matrix.labels.len() {
            print!("  {:<width$}", matrix.matrix[row][col], width = cell_width);
        }
        println!();
    }

    println!();
    println!(
        "  {:<width$}  {:>9}  {:>9}",
        "label",
        "precision",
        "recall",
        width = label_width + 2
    );
    for (i, label) in matrix.labels.iter().enumerate() {
        println!(
            "  {:<width$}  {:>8.1}%  {:>8.1}%",
            label,
            matrix.precision[i],
            matrix.recall[i],
            width = label_width + 2
        );
    }
}

pub fn print_comparison(comparison: &ThresholdComparison) {
    println!("--- Reference thresholds ---\n");
    print_matrix(&comparison.question, &comparison.reference);
    println!("\n--- Adjusted thresholds ---\n");
    print_matrix(&comparison.question, &comparison.adjusted);
    println!();
    println!("  Accuracy delta:  {:+.1}%", comparison.accuracy_delta);
    println!("  Records changed: {}", comparison.changed_records);
}

pub fn print_optimized(question: &str, outcome: &OptimizeOutcome) {
    println!("=== Optimized thresholds: {} ===\n", question);
    println!("  Best accuracy:       {:.1}%", outcome.accuracy);
    println!("  Candidates scored:   {}", outcome.evaluated);
    println!();
    if let Some(thresholds) = outcome.config.question(question) {
        print_question(question, thresholds);
    }
}

fn print_question(
    question: &str,
    thresholds: &defectlens_core::config::schema::QuestionThresholds,
) {
    println!("  {}:", question);
    for (side, side_thresholds) in thresholds.sides() {
        println!("    {}:", side);
        let width = side_thresholds
            .categories()
            .map(|c| c.len())
            .max()
            .unwrap_or(8);
        for (category, range) in side_thresholds.iter() {
            println!("      {:<width$}  {}", category, range, width = width);
        }
    }
}
