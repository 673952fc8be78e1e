//! Top-K selection over aggregated document scores.

use super::aggregation::DocumentScores;
use super::types::{ScoredCandidate, SearchError};
use crate::prediction::{Prediction, RankedDocument};

/// Orders aggregated scores and keeps the best `k`.
///
/// Sorting is stable: documents with exactly equal scores keep the order in
/// which they were first encountered by the aggregator. An empty input yields
/// the single-entry no-answer prediction, never an empty list.
///
/// # Errors
///
/// Returns `SearchError::InvalidK` if `k` is zero.
///
/// # Examples
///
/// ```
/// use docrank_core::search::{select_top_k, DocumentScores, ScoredCandidate};
///
/// let scores = DocumentScores::from_candidates(vec![
///     ScoredCandidate::new("a", 0.2),
///     ScoredCandidate::new("b", 0.9),
///     ScoredCandidate::new("c", 0.5),
/// ]);
/// let prediction = select_top_k("q1", scores, 2).unwrap();
///
/// let ids: Vec<_> = prediction.candidates.iter().map(|c| c.doc_id.as_str()).collect();
/// assert_eq!(ids, ["b", "c"]);
/// ```
pub fn select_top_k(
    query_id: &str,
    scores: DocumentScores,
    k: usize,
) -> Result<Prediction, SearchError> {
    if k == 0 {
        return Err(SearchError::InvalidK(k));
    }
    if scores.is_empty() {
        return Ok(Prediction::no_answer(query_id));
    }

    let mut entries = scores.into_entries();
    // Vec::sort_by is stable; incomparable scores keep their relative order
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(k);

    Ok(Prediction::new(
        query_id,
        entries
            .into_iter()
            .map(|entry| RankedDocument::new(entry.doc_id, entry.score))
            .collect(),
    ))
}

/// Aggregates raw chunk candidates and selects the top `k` documents.
///
/// Used for scores that come from an external lexical engine, which skip the
/// similarity scorer but still go through aggregation and selection.
pub fn rank_candidates<I>(query_id: &str, candidates: I, k: usize) -> Result<Prediction, SearchError>
where
    I: IntoIterator<Item = ScoredCandidate>,
{
    select_top_k(query_id, DocumentScores::from_candidates(candidates), k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(pairs: &[(&str, f64)]) -> Vec<ScoredCandidate> {
        pairs
            .iter()
            .map(|&(id, score)| ScoredCandidate::new(id, score))
            .collect()
    }

    fn ids(prediction: &Prediction) -> Vec<&str> {
        prediction
            .candidates
            .iter()
            .map(|c| c.doc_id.as_str())
            .collect()
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let p = rank_candidates(
            "q",
            candidates(&[("a", 0.1), ("b", 0.7), ("c", 0.4), ("d", 0.9)]),
            3,
        )
        .unwrap();
        assert_eq!(ids(&p), vec!["d", "b", "c"]);
        assert!(p.validate(3).is_ok());
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let p = rank_candidates(
            "q",
            candidates(&[("x", 0.5), ("y", 0.9), ("z", 0.5), ("w", 0.5)]),
            10,
        )
        .unwrap();
        assert_eq!(ids(&p), vec!["y", "x", "z", "w"]);
    }

    #[test]
    fn test_tie_order_uses_first_chunk_seen() {
        // "late" reaches 0.5 on its second chunk but was first seen before "early2"
        let p = rank_candidates(
            "q",
            candidates(&[("late", 0.1), ("early2", 0.5), ("late", 0.5)]),
            10,
        )
        .unwrap();
        assert_eq!(ids(&p), vec!["late", "early2"]);
    }

    #[test]
    fn test_empty_yields_sentinel() {
        let p = rank_candidates("q", Vec::new(), 5).unwrap();
        assert!(p.is_no_answer());
        assert_eq!(p.candidates, vec![RankedDocument::no_answer()]);
    }

    #[test]
    fn test_zero_k_rejected() {
        assert_eq!(
            rank_candidates("q", candidates(&[("a", 1.0)]), 0),
            Err(SearchError::InvalidK(0))
        );
        // Even when there would be nothing to select
        assert_eq!(
            select_top_k("q", DocumentScores::new(), 0),
            Err(SearchError::InvalidK(0))
        );
    }

    #[test]
    fn test_fewer_documents_than_k() {
        let p = rank_candidates("q", candidates(&[("a", 0.3), ("a", 0.6)]), 10).unwrap();
        assert_eq!(p.len(), 1);
        assert_eq!(p.candidates[0].score, 0.6);
    }
}
