//! docrank - produce ranked predictions for TechQA-style questions.
//!
//! # Usage
//!
//! ```bash
//! # Dense retrieval against an embedded corpus snapshot
//! docrank dense dev_Q_A.json corpus.json -o dense.json
//! docrank dense dev_Q_A.json corpus.json --query-vectors queries.jsonl -k 20
//!
//! # Re-rank hits exported from a lexical engine
//! docrank lexical dev_Q_A.json bm25_hits.json -o bm25.json
//!
//! # Score the result
//! docrank-eval dev_Q_A.json dense.json
//! ```

mod config;
mod output;
mod rank;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use docrank_core::config::{default_workers, RankConfig, DEFAULT_SELECTION_K};
use docrank_core::corpus::Corpus;
use docrank_core::embedding::{Encoder, PrecomputedEncoder};
use docrank_core::evaluation::QueryDataset;
use docrank_core::search::load_lexical_hits;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rank documents for every question of an annotation file.
///
/// Writes a prediction file that `docrank-eval` can score.
#[derive(Parser)]
#[command(name = "docrank", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Rank corpus documents by cosine similarity to each query vector
    Dense(DenseArgs),
    /// Rank documents from hits exported by a lexical search engine
    Lexical(LexicalArgs),
}

#[derive(Args)]
struct DenseArgs {
    /// Annotation file (JSON array of question records)
    data_file: PathBuf,

    /// Corpus snapshot with one vector per document chunk
    corpus_file: PathBuf,

    /// JSONL table of query vectors, used for questions without QUESTION_VECTOR
    #[arg(long)]
    query_vectors: Option<PathBuf>,

    /// Number of ranking threads
    #[arg(long, default_value_t = default_workers())]
    workers: usize,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct LexicalArgs {
    /// Annotation file (JSON array of question records)
    data_file: PathBuf,

    /// Lexical hits: {"<query_id>": [{"doc_id": ..., "score": ...}, ...]}
    hits_file: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Write predictions to this file instead of stdout
    #[arg(short, long)]
    out_file: Option<PathBuf>,

    /// Maximum candidates kept per question
    #[arg(short = 'k', long, default_value_t = DEFAULT_SELECTION_K)]
    top_k: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(cli.verbose);

    let (predictions, output) = match cli.command {
        Command::Dense(args) => {
            let dataset = load_dataset(&args.data_file)?;
            let corpus = Corpus::load(&args.corpus_file).with_context(|| {
                format!("Failed to load corpus {}", args.corpus_file.display())
            })?;
            let encoder = args
                .query_vectors
                .as_ref()
                .map(|path| {
                    PrecomputedEncoder::load(path).with_context(|| {
                        format!("Failed to load query vectors {}", path.display())
                    })
                })
                .transpose()?;

            let config = RankConfig {
                k: args.output.top_k,
                workers: args.workers,
            };
            let encoder = encoder.as_ref().map(|e| e as &dyn Encoder);
            let predictions = rank::rank_dense(&dataset, Arc::new(corpus), encoder, config)?;
            (predictions, args.output)
        }
        Command::Lexical(args) => {
            let dataset = load_dataset(&args.data_file)?;
            let hits = load_lexical_hits(&args.hits_file).with_context(|| {
                format!("Failed to load lexical hits {}", args.hits_file.display())
            })?;
            let predictions = rank::rank_lexical(&dataset, hits, args.output.top_k)?;
            (predictions, args.output)
        }
    };

    output::write_predictions(&predictions, output.out_file.as_deref())?;
    eprintln!("{}", output::summary(&predictions));
    Ok(())
}

fn load_dataset(path: &Path) -> Result<QueryDataset> {
    QueryDataset::load(path)
        .with_context(|| format!("Failed to load annotations {}", path.display()))
}
