//! Ranking runs behind the `dense` and `lexical` subcommands.
//!
//! Every question of the annotation file gets exactly one prediction. A
//! question with nothing to rank gets the no-answer sentinel rather than
//! being left out.

use anyhow::{anyhow, Context, Result};
use docrank_core::config::RankConfig;
use docrank_core::corpus::Corpus;
use docrank_core::embedding::Encoder;
use docrank_core::evaluation::QueryDataset;
use docrank_core::prediction::PredictionSet;
use docrank_core::search::{rank_candidates, LexicalHits, QueryVector, RetrievalEngine};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves a vector for every question.
///
/// A question's own `QUESTION_VECTOR` wins; otherwise its text is encoded
/// with `encoder`.
///
/// # Errors
///
/// Fails if a question has no vector and there is no encoder, or the encoder
/// does not know the question text.
pub fn query_vectors(
    dataset: &QueryDataset,
    encoder: Option<&dyn Encoder>,
) -> Result<Vec<QueryVector>> {
    dataset
        .iter()
        .map(|query| {
            let vector = match (&query.vector, encoder) {
                (Some(vector), _) => vector.clone(),
                (None, Some(encoder)) => encoder
                    .encode(query.query_text())
                    .with_context(|| format!("Failed to encode question {}", query.id))?,
                (None, None) => {
                    return Err(anyhow!(
                        "Question {} has no QUESTION_VECTOR; pass --query-vectors",
                        query.id
                    ))
                }
            };
            Ok(QueryVector::new(query.id.clone(), vector))
        })
        .collect()
}

/// Ranks the corpus against every question of `dataset`.
pub fn rank_dense(
    dataset: &QueryDataset,
    corpus: Arc<Corpus>,
    encoder: Option<&dyn Encoder>,
    config: RankConfig,
) -> Result<PredictionSet> {
    let queries = query_vectors(dataset, encoder)?;
    info!(
        "Ranking {} questions against {} chunks ({} documents)",
        queries.len(),
        corpus.len(),
        corpus.document_count()
    );

    let engine = RetrievalEngine::new(corpus, config).context("Invalid ranking configuration")?;

    let pb = progress_bar(queries.len(), "Questions");
    let predictions = engine
        .rank_batch(&queries, || pb.inc(1))
        .context("Dense ranking failed")?;
    pb.finish_and_clear();

    Ok(predictions)
}

/// Turns exported lexical hits into predictions for every question.
///
/// Hits for question ids not in `dataset` are dropped.
pub fn rank_lexical(dataset: &QueryDataset, mut hits: LexicalHits, k: usize) -> Result<PredictionSet> {
    let mut predictions = PredictionSet::new();
    for query in dataset.iter() {
        let query_hits = hits.remove(&query.id).unwrap_or_default();
        if query_hits.is_empty() {
            debug!("No lexical hits for question {}", query.id);
        }
        let prediction = rank_candidates(&query.id, query_hits, k)
            .with_context(|| format!("Failed to rank hits for question {}", query.id))?;
        predictions.insert(prediction);
    }

    for query_id in hits.keys() {
        debug!("Ignoring hits for unknown question {}", query_id);
    }
    Ok(predictions)
}

fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrank_core::corpus::CorpusChunk;
    use docrank_core::embedding::PrecomputedEncoder;
    use docrank_core::search::ScoredCandidate;

    fn dataset(json: &str) -> QueryDataset {
        QueryDataset::from_reader(json.as_bytes()).unwrap()
    }

    fn corpus() -> Arc<Corpus> {
        Arc::new(
            Corpus::new(
                2,
                vec![
                    CorpusChunk::with_index("D1", 0, vec![1.0, 0.0]),
                    CorpusChunk::with_index("D2", 0, vec![0.0, 1.0]),
                    CorpusChunk::with_index("D2", 1, vec![0.6, 0.8]),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_dense_uses_question_vectors() {
        let data = dataset(
            r#"[
                {"QUESTION_ID": "q1", "QUESTION_VECTOR": [0.9, 0.1]},
                {"QUESTION_ID": "q2", "QUESTION_VECTOR": [0.1, 0.9]}
            ]"#,
        );
        let config = RankConfig { k: 1, workers: 2 };
        let predictions = rank_dense(&data, corpus(), None, config).unwrap();

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions.get("q1").unwrap()[0].doc_id, "D1");
        assert_eq!(predictions.get("q2").unwrap()[0].doc_id, "D2");
    }

    #[test]
    fn test_dense_falls_back_to_encoder() {
        let data = dataset(r#"[{"QUESTION_ID": "q1", "QUESTION_TITLE": "db2 crash"}]"#);
        let encoder =
            PrecomputedEncoder::from_pairs(2, vec![("db2 crash".to_string(), vec![0.0, 1.0])])
                .unwrap();
        let predictions =
            rank_dense(&data, corpus(), Some(&encoder as &dyn Encoder), RankConfig::with_k(5)).unwrap();
        let top = predictions.get("q1").unwrap();
        assert_eq!(top[0].doc_id, "D2");
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_dense_without_vectors_fails() {
        let data = dataset(r#"[{"QUESTION_ID": "q1", "QUESTION_TITLE": "x"}]"#);
        let err = query_vectors(&data, None).unwrap_err();
        assert!(err.to_string().contains("--query-vectors"));
    }

    #[test]
    fn test_lexical_fills_every_question() {
        let data = dataset(r#"[{"QUESTION_ID": "q1"}, {"QUESTION_ID": "q2"}]"#);
        let mut hits = LexicalHits::new();
        hits.insert(
            "q1".into(),
            vec![
                ScoredCandidate::new("swg2", 4.0),
                ScoredCandidate::new("swg1", 9.5),
                ScoredCandidate::new("swg2", 11.0),
            ],
        );
        hits.insert("stray".into(), vec![ScoredCandidate::new("swg9", 1.0)]);

        let predictions = rank_lexical(&data, hits, 10).unwrap();
        assert_eq!(predictions.len(), 2);

        let q1 = predictions.get("q1").unwrap();
        assert_eq!(q1.len(), 2);
        assert_eq!(q1[0].doc_id, "swg2");
        assert_eq!(q1[0].score, 11.0);

        assert!(predictions.prediction("q2").unwrap().is_no_answer());
        assert!(!predictions.contains("stray"));
    }

    #[test]
    fn test_lexical_rejects_zero_k() {
        let data = dataset(r#"[{"QUESTION_ID": "q1"}]"#);
        assert!(rank_lexical(&data, LexicalHits::new(), 0).is_err());
    }
}
