//! Dense retrieval over an in-memory corpus.

use super::aggregation::DocumentScores;
use super::selection::{rank_candidates, select_top_k};
use super::similarity::score_corpus;
use super::types::{ScoredCandidate, SearchError};
use crate::config::RankConfig;
use crate::corpus::Corpus;
use crate::error::ConfigError;
use crate::prediction::{Prediction, PredictionSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// A query ready for dense ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    /// Query identifier
    pub query_id: String,
    /// Encoded query
    pub vector: Vec<f32>,
}

impl QueryVector {
    /// Creates a query vector.
    pub fn new(query_id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            query_id: query_id.into(),
            vector,
        }
    }
}

/// Ranks documents of a shared corpus against query vectors.
///
/// The corpus is fully built before the engine exists and is never mutated,
/// so any number of threads can rank against it at once.
///
/// # Example
///
/// ```
/// use docrank_core::config::RankConfig;
/// use docrank_core::corpus::{Corpus, CorpusChunk};
/// use docrank_core::search::RetrievalEngine;
/// use std::sync::Arc;
///
/// let corpus = Corpus::new(2, vec![
///     CorpusChunk::new("D1", vec![1.0, 0.0]),
///     CorpusChunk::new("D2", vec![0.0, 1.0]),
/// ])?;
/// let engine = RetrievalEngine::new(Arc::new(corpus), RankConfig::with_k(1))?;
///
/// let prediction = engine.rank_vector("q1", &[0.9, 0.1])?;
/// assert_eq!(prediction.candidates[0].doc_id, "D1");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    corpus: Arc<Corpus>,
    config: RankConfig,
}

impl RetrievalEngine {
    /// Creates an engine over `corpus`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `config` is invalid.
    pub fn new(corpus: Arc<Corpus>, config: RankConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { corpus, config })
    }

    /// The shared corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The ranking configuration.
    pub fn config(&self) -> RankConfig {
        self.config
    }

    /// Scores every chunk against `vector`, keeps the best chunk per document
    /// and returns the top K documents.
    ///
    /// An empty corpus yields the no-answer sentinel prediction.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::DimensionMismatch`, `EmptyVector`, `ZeroNorm` or
    /// `NonFiniteNorm` if the query vector is unusable.
    #[instrument(skip_all, fields(query_id = query_id))]
    pub fn rank_vector(&self, query_id: &str, vector: &[f32]) -> Result<Prediction, SearchError> {
        let scored = score_corpus(vector, &self.corpus)?;
        let scores = DocumentScores::from_candidates(scored);
        debug!(
            "Aggregated {} chunks into {} documents",
            self.corpus.len(),
            scores.len()
        );
        select_top_k(query_id, scores, self.config.k)
    }

    /// Ranks externally scored hits (e.g. from a lexical engine) with the
    /// engine's K. The corpus is not consulted.
    pub fn rank_hits(
        &self,
        query_id: &str,
        hits: Vec<ScoredCandidate>,
    ) -> Result<Prediction, SearchError> {
        rank_candidates(query_id, hits, self.config.k)
    }

    /// Ranks many queries across `config.workers` threads.
    ///
    /// Queries are split into contiguous batches, one per worker; each worker
    /// reads the shared corpus and produces its own predictions. The combined
    /// [`PredictionSet`] is keyed by query id, so the result does not depend on
    /// which worker finished first. `on_ranked` is called once per query from
    /// the worker threads (use it to drive a progress bar).
    ///
    /// # Errors
    ///
    /// Returns the first `SearchError` encountered; no partial set is returned.
    #[instrument(skip_all, fields(queries = queries.len(), workers = self.config.workers))]
    pub fn rank_batch<F>(
        &self,
        queries: &[QueryVector],
        on_ranked: F,
    ) -> Result<PredictionSet, SearchError>
    where
        F: Fn() + Sync,
    {
        let start = Instant::now();
        if queries.is_empty() {
            return Ok(PredictionSet::new());
        }

        let workers = self.config.workers.min(queries.len());
        let batch_size = queries.len().div_ceil(workers);

        let batches: Vec<Result<Vec<Prediction>, SearchError>> = std::thread::scope(|s| {
            let handles: Vec<_> = queries
                .chunks(batch_size)
                .map(|batch| {
                    let on_ranked = &on_ranked;
                    s.spawn(move || {
                        batch
                            .iter()
                            .map(|query| {
                                let prediction = self.rank_vector(&query.query_id, &query.vector);
                                on_ranked();
                                prediction
                            })
                            .collect::<Result<Vec<_>, _>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().expect("ranking worker panicked"))
                .collect()
        });

        let mut set = PredictionSet::new();
        for batch in batches {
            for prediction in batch? {
                set.insert(prediction);
            }
        }

        let elapsed = start.elapsed();
        debug!(
            "Ranked {} queries in {:?} ({:.2}ms/query)",
            queries.len(),
            elapsed,
            elapsed.as_secs_f64() * 1000.0 / queries.len() as f64
        );
        Ok(set)
    }
}
