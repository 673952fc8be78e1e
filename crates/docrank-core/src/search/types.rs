use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw relevance score for one chunk comparison.
///
/// Produced by the similarity scorer (one per corpus chunk) or supplied
/// directly by an external lexical engine. Several candidates may share a
/// `doc_id` when a document was split into multiple chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Document the scored chunk belongs to
    pub doc_id: String,
    /// Relevance score (cosine similarity or lexical engine score)
    pub score: f64,
}

impl ScoredCandidate {
    /// Creates a new candidate.
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }
}

/// Per-document score after chunk aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentScore {
    /// Document identifier
    pub doc_id: String,
    /// Best score over the document's chunks
    pub score: f64,
    /// Number of chunk candidates that were folded into this entry
    pub chunk_count: usize,
}

/// Which side of a similarity computation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// First argument (the query vector in ranking)
    Left,
    /// Second argument (the corpus chunk in ranking)
    Right,
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Left => write!(f, "left"),
            Operand::Right => write!(f, "right"),
        }
    }
}

/// Error types for scoring and ranking.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// Vector dimension mismatch (expected vs actual)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension
        expected: usize,
        /// Actual embedding dimension received
        actual: usize,
    },
    /// A vector with zero norm was passed to cosine similarity
    #[error("Zero-norm {0} vector: cosine similarity is undefined")]
    ZeroNorm(Operand),
    /// A vector whose norm is infinite or NaN (a component is not finite)
    #[error("Non-finite norm for {0} vector")]
    NonFiniteNorm(Operand),
    /// Zero-length vectors cannot be compared
    #[error("Empty vector")]
    EmptyVector,
    /// Selection cutoff must be at least 1
    #[error("Invalid K: {0} (must be >= 1)")]
    InvalidK(usize),
}

/// Checks that an embedding has the expected dimension.
pub fn validate_dimension(expected: usize, actual: usize) -> Result<(), SearchError> {
    if expected != actual {
        return Err(SearchError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dimension() {
        assert!(validate_dimension(3, 3).is_ok());
        assert_eq!(
            validate_dimension(3, 4),
            Err(SearchError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_zero_norm_message_names_operand() {
        let err = SearchError::ZeroNorm(Operand::Left);
        assert!(err.to_string().contains("left"));
    }

    #[test]
    fn test_scored_candidate_deserializes() {
        let c: ScoredCandidate = serde_json::from_str(r#"{"doc_id":"swg1","score":3.5}"#).unwrap();
        assert_eq!(c, ScoredCandidate::new("swg1", 3.5));
    }

    #[test]
    fn test_scored_candidate_keeps_full_precision() {
        let c: ScoredCandidate =
            serde_json::from_str(r#"{"doc_id":"swg1","score":13.234567890123}"#).unwrap();
        assert_eq!(c.score, 13.234567890123);
    }
}
