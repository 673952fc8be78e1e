//! Document-level aggregation for chunk scores.
//!
//! Collapses chunk-level candidates into one score per document.

use super::types::{DocumentScore, ScoredCandidate};
use std::collections::HashMap;

/// One score per distinct document, in first-encounter order.
///
/// # Scoring Strategy (Max Aggregation)
///
/// A document is relevant if any of its chunks is relevant, so each document
/// is represented by its best chunk. A long manual split into twenty chunks
/// with one strong match ranks by that match, not by the average of the
/// nineteen weak ones.
///
/// Entry order is the order in which document ids were first seen. The top-K
/// selector relies on this to break exact score ties deterministically.
///
/// # Examples
///
/// ```
/// use docrank_core::search::{DocumentScores, ScoredCandidate};
///
/// let scores = DocumentScores::from_candidates(vec![
///     ScoredCandidate::new("D5", 0.3),
///     ScoredCandidate::new("D7", 0.5),
///     ScoredCandidate::new("D5", 0.8),
/// ]);
///
/// assert_eq!(scores.len(), 2);
/// assert_eq!(scores.get("D5"), Some(0.8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentScores {
    entries: Vec<DocumentScore>,
    positions: HashMap<String, usize>,
}

impl DocumentScores {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates an unordered sequence of chunk candidates.
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = ScoredCandidate>,
    {
        let mut scores = Self::new();
        for candidate in candidates {
            scores.insert_max(candidate.doc_id, candidate.score);
        }
        scores
    }

    /// Inserts a score for `doc_id`, keeping the maximum if the document is
    /// already present.
    pub fn insert_max(&mut self, doc_id: String, score: f64) {
        match self.positions.get(&doc_id) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.chunk_count += 1;
                if score > entry.score {
                    entry.score = score;
                }
            }
            None => {
                self.positions.insert(doc_id.clone(), self.entries.len());
                self.entries.push(DocumentScore {
                    doc_id,
                    score,
                    chunk_count: 1,
                });
            }
        }
    }

    /// Returns the aggregated score for a document.
    pub fn get(&self, doc_id: &str) -> Option<f64> {
        self.positions.get(doc_id).map(|&pos| self.entries[pos].score)
    }

    /// Number of distinct documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no candidate was aggregated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentScore> {
        self.entries.iter()
    }

    /// Consumes the mapping, returning entries in first-encounter order.
    pub fn into_entries(self) -> Vec<DocumentScore> {
        self.entries
    }
}

impl FromIterator<ScoredCandidate> for DocumentScores {
    fn from_iter<I: IntoIterator<Item = ScoredCandidate>>(iter: I) -> Self {
        Self::from_candidates(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_over_chunks() {
        let scores = DocumentScores::from_candidates(vec![
            ScoredCandidate::new("D5", 0.3),
            ScoredCandidate::new("D5", 0.8),
        ]);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("D5"), Some(0.8));
    }

    #[test]
    fn test_max_independent_of_chunk_order() {
        let forward = DocumentScores::from_candidates(vec![
            ScoredCandidate::new("a", 0.1),
            ScoredCandidate::new("a", 0.9),
            ScoredCandidate::new("a", 0.4),
        ]);
        let backward = DocumentScores::from_candidates(vec![
            ScoredCandidate::new("a", 0.4),
            ScoredCandidate::new("a", 0.9),
            ScoredCandidate::new("a", 0.1),
        ]);
        assert_eq!(forward.get("a"), backward.get("a"));
    }

    #[test]
    fn test_first_encounter_order_and_chunk_counts() {
        let scores: DocumentScores = vec![
            ScoredCandidate::new("b", 0.2),
            ScoredCandidate::new("a", 0.7),
            ScoredCandidate::new("b", 0.5),
            ScoredCandidate::new("c", 0.1),
        ]
        .into_iter()
        .collect();

        let entries = scores.into_entries();
        let ids: Vec<&str> = entries.iter().map(|e| e.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(entries[0].chunk_count, 2);
        assert_eq!(entries[0].score, 0.5);
        assert_eq!(entries[1].chunk_count, 1);
    }

    #[test]
    fn test_negative_scores_keep_maximum() {
        let scores = DocumentScores::from_candidates(vec![
            ScoredCandidate::new("x", -0.6),
            ScoredCandidate::new("x", -0.2),
        ]);
        assert_eq!(scores.get("x"), Some(-0.2));
    }

    #[test]
    fn test_empty_input_returns_empty() {
        let scores = DocumentScores::from_candidates(Vec::new());
        assert!(scores.is_empty());
        assert_eq!(scores.get("anything"), None);
    }
}
