//! Per-query retrieval metrics.

use crate::prediction::RankedDocument;
use serde::Serialize;
use std::fmt;

/// How a query's prediction was found during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// A ranked candidate list was present
    Ranked,
    /// No prediction, or an empty candidate list
    Missing,
    /// The prediction is the no-answer sentinel
    NoAnswer,
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryStatus::Ranked => "ranked",
            QueryStatus::Missing => "missing",
            QueryStatus::NoAnswer => "no_answer",
        };
        f.write_str(name)
    }
}

/// Evaluation outcome for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryScore {
    /// Query identifier
    pub query_id: String,
    /// Whether the query is answerable (HasAns stratum)
    pub answerable: bool,
    /// Reciprocal rank in [0, 1]
    pub reciprocal_rank: f64,
    /// How the prediction was found
    pub status: QueryStatus,
}

/// Computes reciprocal rank with a cutoff.
///
/// Reciprocal Rank is 1/position of the first candidate whose id equals the
/// gold document id, looking only at the first `top_k` candidates.
///
/// # Formula
///
/// ```text
/// RR = 1 / rank_of_gold_document    (rank <= top_k)
/// RR = 0                            otherwise
/// ```
///
/// # Arguments
///
/// * `candidates` - Ranked candidates, best first
/// * `gold_doc_id` - Gold document id; an empty id never matches
/// * `top_k` - Evaluation cutoff
///
/// # Returns
///
/// Reciprocal rank between 0.0 and 1.0.
///
/// # Examples
///
/// ```
/// use docrank_core::evaluation::reciprocal_rank;
/// use docrank_core::prediction::RankedDocument;
///
/// let ranked = vec![RankedDocument::new("D3", 0.9), RankedDocument::new("D7", 0.8)];
/// assert_eq!(reciprocal_rank(&ranked, "D7", 10), 0.5);
/// assert_eq!(reciprocal_rank(&ranked, "D7", 1), 0.0);
/// ```
pub fn reciprocal_rank(candidates: &[RankedDocument], gold_doc_id: &str, top_k: usize) -> f64 {
    if gold_doc_id.is_empty() {
        return 0.0;
    }

    candidates
        .iter()
        .take(top_k)
        .position(|c| c.doc_id == gold_doc_id)
        .map_or(0.0, |i| 1.0 / (i + 1) as f64)
}

/// Mean of a slice, 0.0 when empty.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(ids: &[&str]) -> Vec<RankedDocument> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| RankedDocument::new(*id, 1.0 - i as f64 * 0.1))
            .collect()
    }

    #[test]
    fn test_rr_positions() {
        let list = ranked(&["D3", "D7", "D1"]);
        assert_eq!(reciprocal_rank(&list, "D3", 10), 1.0);
        assert_eq!(reciprocal_rank(&list, "D7", 10), 0.5);
        assert!((reciprocal_rank(&list, "D1", 10) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(reciprocal_rank(&list, "D9", 10), 0.0);
    }

    #[test]
    fn test_rr_cutoff() {
        let list = ranked(&["a", "b", "c", "d"]);
        assert_eq!(reciprocal_rank(&list, "d", 3), 0.0);
        assert_eq!(reciprocal_rank(&list, "c", 3), 1.0 / 3.0);
    }

    #[test]
    fn test_empty_gold_never_matches() {
        let sentinel = vec![RankedDocument::no_answer()];
        assert_eq!(reciprocal_rank(&sentinel, "", 10), 0.0);
        assert_eq!(reciprocal_rank(&ranked(&["a"]), "", 10), 0.0);
    }

    #[test]
    fn test_first_match_wins() {
        let list = ranked(&["x", "g", "g"]);
        assert_eq!(reciprocal_rank(&list, "g", 10), 0.5);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(QueryStatus::NoAnswer.to_string(), "no_answer");
        assert_eq!(
            serde_json::to_string(&QueryStatus::Missing).unwrap(),
            "\"missing\""
        );
    }
}
