//! Writing prediction files.
//!
//! Predictions go to stdout as indented JSON, or to `--out-file` as compact
//! JSON. A one-line summary is printed to stderr so it never mixes with the
//! JSON on stdout.

use anyhow::{Context, Result};
use docrank_core::prediction::PredictionSet;
use std::path::Path;

/// Writes `predictions` to `out_file`, or to stdout when `None`.
pub fn write_predictions(predictions: &PredictionSet, out_file: Option<&Path>) -> Result<()> {
    match out_file {
        Some(path) => predictions
            .save(path)
            .with_context(|| format!("Failed to write predictions to {}", path.display())),
        None => {
            let json = predictions
                .to_json_pretty()
                .context("Failed to serialize predictions")?;
            println!("{}", json);
            Ok(())
        }
    }
}

/// Human-readable summary of a prediction set.
pub fn summary(predictions: &PredictionSet) -> String {
    let no_answer = predictions.no_answer_count();
    format!(
        "Ranked {} quer{} ({} without candidates)",
        predictions.len(),
        if predictions.len() == 1 { "y" } else { "ies" },
        no_answer
    )
}
