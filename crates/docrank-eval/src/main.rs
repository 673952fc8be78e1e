//! docrank-eval - score a prediction file with mean reciprocal rank.
//!
//! # Usage
//!
//! ```bash
//! # Print the report
//! docrank-eval dev_Q_A.json predictions.json
//!
//! # Only count the first 5 candidates, write compact JSON to a file
//! docrank-eval dev_Q_A.json predictions.json -k 5 -o scores.json
//!
//! # Per-query breakdown and bootstrap confidence intervals on stderr
//! docrank-eval dev_Q_A.json predictions.json --per-query --bootstrap 1000
//! ```

mod report;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use docrank_core::config::DEFAULT_EVAL_TOP_K;
use docrank_core::evaluation::{Evaluator, QueryDataset};
use docrank_core::prediction::PredictionSet;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docrank-eval", version)]
#[command(about = "Score ranked predictions against gold annotations (MRR)")]
struct Args {
    /// Annotation file (JSON array of question records)
    data_file: PathBuf,

    /// Prediction file ({"predictions": {...}})
    pred_file: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    out_file: Option<PathBuf>,

    /// Only the first K candidates of each prediction are considered
    #[arg(short = 'k', long, default_value_t = DEFAULT_EVAL_TOP_K)]
    top_k: usize,

    /// Print each query's reciprocal rank to stderr
    #[arg(long)]
    per_query: bool,

    /// Bootstrap resamples for 95% confidence intervals (0 disables)
    #[arg(long, default_value_t = 0)]
    bootstrap: usize,

    /// Seed for bootstrap resampling
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let evaluator = Evaluator::new(args.top_k).context("Invalid --top-k")?;
    let dataset = QueryDataset::load(&args.data_file)
        .with_context(|| format!("Failed to load annotations {}", args.data_file.display()))?;
    let predictions = PredictionSet::load(&args.pred_file)
        .with_context(|| format!("Failed to load predictions {}", args.pred_file.display()))?;

    info!(
        "Scoring {} predictions against {} queries ({} answerable) at top_k={}",
        predictions.len(),
        dataset.len(),
        dataset.answerable_count(),
        evaluator.top_k()
    );

    let result = evaluator.evaluate(&dataset, &predictions);

    if args.per_query {
        eprint!("{}", report::format_per_query(&result));
    }
    if args.bootstrap > 0 {
        eprint!("{}", report::format_bootstrap(&result, args.bootstrap, args.seed));
    }

    match &args.out_file {
        Some(path) => {
            let json = result.report.to_json().context("Failed to serialize report")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
        }
        None => {
            let json = result
                .report
                .to_json_pretty()
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    Ok(())
}
