//! Cosine similarity between embedding vectors.
//!
//! Vectors are stored as `f32`; sums, norms and the final ratio are computed
//! in `f64`, where the square of any finite `f32` component cannot overflow.
//!
//! A zero-norm vector means the encoder failed upstream. Both functions
//! return `SearchError::ZeroNorm` for it instead of a score, and
//! `SearchError::NonFiniteNorm` for a vector holding an infinite or NaN
//! component.

use super::types::{validate_dimension, Operand, ScoredCandidate, SearchError};
use crate::corpus::Corpus;

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Euclidean (L2) norm of a vector.
#[inline]
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

fn checked_norm(v: &[f32], operand: Operand) -> Result<f64, SearchError> {
    let norm = l2_norm(v);
    if !norm.is_finite() {
        return Err(SearchError::NonFiniteNorm(operand));
    }
    if norm == 0.0 {
        return Err(SearchError::ZeroNorm(operand));
    }
    Ok(norm)
}

/// Computes cosine similarity: `dot(a, b) / (‖a‖ · ‖b‖)`.
///
/// # Errors
///
/// - `SearchError::DimensionMismatch` if the vectors differ in length
/// - `SearchError::EmptyVector` if both are empty
/// - `SearchError::ZeroNorm` if either vector has zero norm
/// - `SearchError::NonFiniteNorm` if either vector has an infinite or NaN component
///
/// # Examples
///
/// ```
/// use docrank_core::search::cosine_similarity;
///
/// let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 1.0]).unwrap();
/// assert!((sim - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, SearchError> {
    validate_dimension(a.len(), b.len())?;
    if a.is_empty() {
        return Err(SearchError::EmptyVector);
    }

    let norm_a = checked_norm(a, Operand::Left)?;
    let norm_b = checked_norm(b, Operand::Right)?;

    Ok(dot(a, b) / (norm_a * norm_b))
}

/// Scores a query vector against every chunk in the corpus.
///
/// The query is validated once; chunk norms were validated and cached when
/// the corpus was built, so the per-chunk work is a dot product and a divide.
/// Returns one candidate per chunk, in corpus order.
pub fn score_corpus(query: &[f32], corpus: &Corpus) -> Result<Vec<ScoredCandidate>, SearchError> {
    validate_dimension(corpus.dimension(), query.len())?;
    if query.is_empty() {
        return Err(SearchError::EmptyVector);
    }
    let query_norm = checked_norm(query, Operand::Left)?;

    Ok(corpus
        .chunks_with_norms()
        .map(|(chunk, norm)| {
            ScoredCandidate::new(
                chunk.doc_id.clone(),
                dot(query, &chunk.vector) / (query_norm * norm),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusChunk;

    #[test]
    fn test_identical_vectors() {
        let sim = cosine_similarity(&[0.3, 0.4, 0.5], &[0.3, 0.4, 0.5]).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((opposite + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_invariant() {
        let a = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 1.0, 0.5]).unwrap();
        let b = cosine_similarity(&[10.0, 20.0, 30.0], &[2.0, 1.0, 0.5]).unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_zero_norm_is_error() {
        assert_eq!(
            cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]),
            Err(SearchError::ZeroNorm(Operand::Left))
        );
        assert_eq!(
            cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]),
            Err(SearchError::ZeroNorm(Operand::Right))
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(SearchError::DimensionMismatch { .. })
        ));
        assert_eq!(cosine_similarity(&[], &[]), Err(SearchError::EmptyVector));
    }

    #[test]
    fn test_score_corpus_matches_pairwise() {
        let corpus = Corpus::new(
            2,
            vec![
                CorpusChunk::new("a", vec![1.0, 0.0]),
                CorpusChunk::new("b", vec![3.0, 4.0]),
            ],
        )
        .unwrap();

        let query = [0.6, 0.8];
        let scored = score_corpus(&query, &corpus).unwrap();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].doc_id, "a");
        assert!((scored[0].score - cosine_similarity(&query, &[1.0, 0.0]).unwrap()).abs() < 1e-6);
        assert!((scored[1].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_large_components_do_not_overflow() {
        let corpus = Corpus::new(
            2,
            vec![
                CorpusChunk::new("D2", vec![0.0, 1.0]),
                CorpusChunk::new("D1", vec![1.0, 0.0]),
            ],
        )
        .unwrap();

        let scored = score_corpus(&[1e20, 1e19], &corpus).unwrap();
        let expected_d1 = 10.0 / 101f64.sqrt();
        assert!((scored[1].score - expected_d1).abs() < 1e-6);
        assert!((scored[0].score - expected_d1 / 10.0).abs() < 1e-6);

        let sim = cosine_similarity(&[3e38, 3e38], &[10.0, 10.0]).unwrap();
        assert!(sim.is_finite());
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_components_rejected() {
        assert_eq!(
            cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 0.0]),
            Err(SearchError::NonFiniteNorm(Operand::Left))
        );
        assert_eq!(
            cosine_similarity(&[1.0, 0.0], &[f32::NAN, 1.0]),
            Err(SearchError::NonFiniteNorm(Operand::Right))
        );

        let corpus = Corpus::new(2, vec![CorpusChunk::new("a", vec![1.0, 0.0])]).unwrap();
        assert_eq!(
            score_corpus(&[f32::NAN, 1.0], &corpus),
            Err(SearchError::NonFiniteNorm(Operand::Left))
        );
    }

    #[test]
    fn test_score_corpus_rejects_bad_query() {
        let corpus = Corpus::new(2, vec![CorpusChunk::new("a", vec![1.0, 0.0])]).unwrap();
        assert_eq!(
            score_corpus(&[0.0, 0.0], &corpus),
            Err(SearchError::ZeroNorm(Operand::Left))
        );
        assert!(matches!(
            score_corpus(&[1.0, 0.0, 0.0], &corpus),
            Err(SearchError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }
}
