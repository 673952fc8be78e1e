//! Evaluation of ranked predictions against gold annotations.
//!
//! Each query is scored by the reciprocal rank of its gold document inside the
//! first `top_k` candidates of its prediction. Scores are averaged overall and
//! per stratum:
//!
//! | Stratum | Queries | Gold id |
//! |---------|---------|---------|
//! | HasAns | `ANSWERABLE == "Y"` | `DOCUMENT` |
//! | NoAns | everything else | empty, never matches |
//!
//! A query with no prediction scores 0 and is logged as a warning; the run
//! goes on. Predictions for query ids the dataset does not know are ignored.
//!
//! # Example
//!
//! ```
//! use docrank_core::evaluation::{Evaluator, QueryDataset};
//! use docrank_core::prediction::{Prediction, PredictionSet, RankedDocument};
//!
//! let dataset = QueryDataset::from_reader(r#"[
//!     {"QUESTION_ID": "q1", "ANSWERABLE": "Y", "DOCUMENT": "D7"},
//!     {"QUESTION_ID": "q2", "ANSWERABLE": "N", "DOCUMENT": "-"}
//! ]"#.as_bytes())?;
//!
//! let mut predictions = PredictionSet::new();
//! predictions.insert(Prediction::new("q1", vec![
//!     RankedDocument::new("D3", 0.9),
//!     RankedDocument::new("D7", 0.8),
//! ]));
//! predictions.insert(Prediction::no_answer("q2"));
//!
//! let result = Evaluator::new(10)?.evaluate(&dataset, &predictions);
//! assert_eq!(result.report.overall.mrr, 0.25);
//! assert_eq!(result.report.has_ans.unwrap().mrr, 0.5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod datasets;
pub mod metrics;
mod report;
pub mod stats;

pub use datasets::{Query, QueryDataset};
pub use metrics::{reciprocal_rank, QueryScore, QueryStatus};
pub use report::{EvalReport, StratumMetrics};
pub use stats::{bootstrap_ci, BootstrapResult};

use crate::config::EvalConfig;
use crate::error::EvaluationError;
use crate::prediction::{PredictionSet, RankedDocument};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Scores predictions with a fixed rank cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    top_k: usize,
}

impl Evaluator {
    /// Creates an evaluator that scans the first `top_k` candidates.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::InvalidTopK` if `top_k` is zero.
    pub fn new(top_k: usize) -> Result<Self, EvaluationError> {
        if top_k == 0 {
            return Err(EvaluationError::InvalidTopK(top_k));
        }
        Ok(Self { top_k })
    }

    /// Creates an evaluator from an [`EvalConfig`].
    pub fn from_config(config: EvalConfig) -> Result<Self, EvaluationError> {
        Self::new(config.top_k)
    }

    /// The rank cutoff.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Scores one query against its prediction, if any.
    pub fn score_query(&self, query: &Query, candidates: Option<&[RankedDocument]>) -> QueryScore {
        let (reciprocal_rank, status) = match candidates {
            None | Some([]) => {
                warn!("No prediction for query {}; scoring it 0", query.id);
                (0.0, QueryStatus::Missing)
            }
            Some([only]) if only.is_no_answer() => {
                warn!("Query {} has a degenerate no-answer prediction", query.id);
                (0.0, QueryStatus::NoAnswer)
            }
            Some(list) => (
                reciprocal_rank(list, &query.gold_doc_id, self.top_k),
                QueryStatus::Ranked,
            ),
        };

        QueryScore {
            query_id: query.id.clone(),
            answerable: query.answerable,
            reciprocal_rank,
            status,
        }
    }

    /// Scores every query of `dataset` and aggregates the report.
    #[instrument(skip_all, fields(queries = dataset.len(), top_k = self.top_k))]
    pub fn evaluate(&self, dataset: &QueryDataset, predictions: &PredictionSet) -> EvaluationResult {
        for (query_id, _) in predictions.iter() {
            if !dataset.contains(query_id) {
                debug!("Ignoring prediction for unknown query {}", query_id);
            }
        }

        let scores: BTreeMap<String, QueryScore> = dataset
            .iter()
            .map(|query| {
                let score = self.score_query(query, predictions.get(&query.id));
                (query.id.clone(), score)
            })
            .collect();

        let result = EvaluationResult::from_scores(scores);
        if result.scores.is_empty() {
            warn!("Dataset has no queries; reporting MRR 0");
        }
        info!("{}", result.report);
        result
    }
}

/// Per-query scores and the aggregate report of one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Scores keyed by query id
    pub scores: BTreeMap<String, QueryScore>,
    /// Aggregate MRR
    pub report: EvalReport,
}

impl EvaluationResult {
    /// Aggregates per-query scores. Sums run in query id order.
    pub fn from_scores(scores: BTreeMap<String, QueryScore>) -> Self {
        let all: Vec<f64> = scores.values().map(|s| s.reciprocal_rank).collect();
        let (has_ans, no_ans): (Vec<&QueryScore>, Vec<&QueryScore>) =
            scores.values().partition(|s| s.answerable);

        let stratum = |group: Vec<&QueryScore>| {
            if group.is_empty() {
                None
            } else {
                let ranks: Vec<f64> = group.iter().map(|s| s.reciprocal_rank).collect();
                Some(StratumMetrics::from_ranks(&ranks))
            }
        };

        let report = EvalReport {
            overall: StratumMetrics::from_ranks(&all),
            has_ans: stratum(has_ans),
            no_ans: stratum(no_ans),
        };
        Self { scores, report }
    }

    /// Reciprocal ranks in query id order, optionally restricted to one
    /// stratum (`Some(true)` for HasAns, `Some(false)` for NoAns).
    pub fn ranks(&self, answerable: Option<bool>) -> Vec<f64> {
        self.scores
            .values()
            .filter(|s| answerable.map_or(true, |a| s.answerable == a))
            .map(|s| s.reciprocal_rank)
            .collect()
    }

    /// Number of queries with the given status.
    pub fn count_status(&self, status: QueryStatus) -> usize {
        self.scores.values().filter(|s| s.status == status).count()
    }
}
