//! Hits supplied by an external lexical search engine.
//!
//! The lexical engine (BM25 over a stemmed body field in the TechQA baseline)
//! owns its index and query parsing. What it hands over is a per-query list of
//! scored hits:
//!
//! ```text
//! { "<query_id>": [ { "doc_id": "swg21", "score": 13.2 }, ... ], ... }
//! ```
//!
//! Hits may be unsorted and may repeat a document; they go through the same
//! aggregation and top-K selection as dense scores.

use super::types::ScoredCandidate;
use crate::error::PredictionError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Lexical hits keyed by query id.
pub type LexicalHits = BTreeMap<String, Vec<ScoredCandidate>>;

/// Parses a lexical hits file from a reader.
pub fn read_lexical_hits<R: Read>(reader: R) -> Result<LexicalHits, PredictionError> {
    let hits: LexicalHits = serde_json::from_reader(reader)?;
    debug!(
        "Parsed {} lexical hits for {} queries",
        hits.values().map(Vec::len).sum::<usize>(),
        hits.len()
    );
    Ok(hits)
}

/// Loads a lexical hits file from disk.
pub fn load_lexical_hits(path: impl AsRef<Path>) -> Result<LexicalHits, PredictionError> {
    let file = File::open(path.as_ref())?;
    read_lexical_hits(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::rank_candidates;

    #[test]
    fn test_read_hits() {
        let json = r#"{
            "q1": [ {"doc_id": "a", "score": 2.5}, {"doc_id": "a", "score": 4.0} ],
            "q2": []
        }"#;
        let hits = read_lexical_hits(json.as_bytes()).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits["q1"][1], ScoredCandidate::new("a", 4.0));
        assert!(hits["q2"].is_empty());
    }

    #[test]
    fn test_scores_beyond_f32_precision_keep_their_order() {
        let json = r#"{"q": [
            {"doc_id": "A", "score": 13.00000001},
            {"doc_id": "B", "score": 13.00000002},
            {"doc_id": "C", "score": 13.234567890123}
        ]}"#;
        let mut hits = read_lexical_hits(json.as_bytes()).unwrap();
        let prediction = rank_candidates("q", hits.remove("q").unwrap(), 10).unwrap();

        let ranked: Vec<(&str, f64)> = prediction
            .candidates
            .iter()
            .map(|c| (c.doc_id.as_str(), c.score))
            .collect();
        assert_eq!(
            ranked,
            vec![("C", 13.234567890123), ("B", 13.00000002), ("A", 13.00000001)]
        );
    }

    #[test]
    fn test_malformed_hits_rejected() {
        let json = r#"{"q1": [ {"doc_id": "a"} ]}"#;
        assert!(matches!(
            read_lexical_hits(json.as_bytes()),
            Err(PredictionError::Json(_))
        ));
    }
}
