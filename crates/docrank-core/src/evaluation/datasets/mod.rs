//! Annotation datasets for evaluation.
//!
//! The gold annotations follow the TechQA layout: a single JSON array of
//! question records.
//!
//! ```text
//! [
//!   {
//!     "QUESTION_ID": "TRAIN_Q000",
//!     "QUESTION_TITLE": "Installing DB2 on AIX fails",
//!     "QUESTION_TEXT": "When I run db2setup ...",
//!     "ANSWERABLE": "Y",
//!     "DOCUMENT": "swg21380147",
//!     "QUESTION_VECTOR": [0.12, -0.03, ...]     // optional
//!   },
//!   ...
//! ]
//! ```
//!
//! Only `QUESTION_ID` is required. A record is answerable when `ANSWERABLE`
//! is exactly `"Y"`; its gold document is then `DOCUMENT`. Unanswerable
//! records always have an empty gold id, whatever `DOCUMENT` holds (TechQA
//! puts `"-"` there).

use crate::error::DatasetError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

// ============================================================================
// Data Structures
// ============================================================================

/// Raw annotation record as it appears on disk.
#[derive(Debug, Deserialize)]
struct AnnotationRecord {
    #[serde(rename = "QUESTION_ID")]
    id: String,
    #[serde(rename = "QUESTION_TITLE", default)]
    title: Option<String>,
    #[serde(rename = "QUESTION_TEXT", default)]
    body: Option<String>,
    #[serde(rename = "ANSWERABLE", default)]
    answerable: Option<String>,
    #[serde(rename = "DOCUMENT", default)]
    document: Option<String>,
    #[serde(rename = "QUESTION_VECTOR", default)]
    vector: Option<Vec<f32>>,
}

/// One annotated query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Unique query identifier.
    pub id: String,
    /// Short question title.
    pub title: String,
    /// Full question body.
    pub body: String,
    /// Precomputed query vector, if the annotation carries one.
    pub vector: Option<Vec<f32>>,
    /// Gold document id; empty when the query is unanswerable.
    pub gold_doc_id: String,
    /// Whether the query has an answer in the corpus.
    pub answerable: bool,
}

impl Query {
    /// Text used to search for this query: the title, or the body when the
    /// title is blank.
    pub fn query_text(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.body
        } else {
            &self.title
        }
    }
}

impl From<AnnotationRecord> for Query {
    fn from(record: AnnotationRecord) -> Self {
        let answerable = record.answerable.as_deref() == Some("Y");
        let gold_doc_id = if answerable {
            record.document.unwrap_or_default()
        } else {
            String::new()
        };
        Self {
            id: record.id,
            title: record.title.unwrap_or_default(),
            body: record.body.unwrap_or_default(),
            vector: record.vector,
            gold_doc_id,
            answerable,
        }
    }
}

/// All annotated queries of one evaluation split.
#[derive(Debug, Clone, Default)]
pub struct QueryDataset {
    queries: Vec<Query>,
    positions: HashMap<String, usize>,
}

impl QueryDataset {
    /// Builds a dataset, rejecting duplicate query ids.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::DuplicateQueryId` for the first repeated id.
    pub fn from_queries(queries: Vec<Query>) -> Result<Self, DatasetError> {
        let mut positions = HashMap::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            if positions.insert(query.id.clone(), i).is_some() {
                return Err(DatasetError::DuplicateQueryId(query.id.clone()));
            }
            if query.answerable && query.gold_doc_id.is_empty() {
                warn!(
                    "Query {} is answerable but has no gold document; it can only score 0",
                    query.id
                );
            }
        }
        Ok(Self { queries, positions })
    }

    /// Parses a TechQA-style annotation array.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let records: Vec<AnnotationRecord> = serde_json::from_reader(reader)?;
        Self::from_queries(records.into_iter().map(Query::from).collect())
    }

    /// Loads an annotation file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        debug!(
            "Loaded {} queries ({} answerable) from {}",
            dataset.len(),
            dataset.answerable_count(),
            path.display()
        );
        Ok(dataset)
    }

    /// Looks up a query by id.
    pub fn get(&self, query_id: &str) -> Option<&Query> {
        self.positions.get(query_id).map(|&i| &self.queries[i])
    }

    /// Returns true if the dataset has a query with this id.
    pub fn contains(&self, query_id: &str) -> bool {
        self.positions.contains_key(query_id)
    }

    /// Iterates queries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Query> {
        self.queries.iter()
    }

    /// Number of queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Returns true if there are no queries.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Number of answerable queries.
    pub fn answerable_count(&self) -> usize {
        self.queries.iter().filter(|q| q.answerable).count()
    }

    /// Number of unanswerable queries.
    pub fn unanswerable_count(&self) -> usize {
        self.len() - self.answerable_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"QUESTION_ID": "Q1", "QUESTION_TITLE": "db2 install fails",
         "QUESTION_TEXT": "long body", "ANSWERABLE": "Y", "DOCUMENT": "swg1"},
        {"QUESTION_ID": "Q2", "QUESTION_TITLE": "", "QUESTION_TEXT": "only a body",
         "ANSWERABLE": "N", "DOCUMENT": "-", "QUESTION_VECTOR": [0.5, 0.5]},
        {"QUESTION_ID": "Q3"}
    ]"#;

    #[test]
    fn test_parse_records() {
        let dataset = QueryDataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.answerable_count(), 1);
        assert_eq!(dataset.unanswerable_count(), 2);

        let q1 = dataset.get("Q1").unwrap();
        assert!(q1.answerable);
        assert_eq!(q1.gold_doc_id, "swg1");
        assert_eq!(q1.query_text(), "db2 install fails");

        let q2 = dataset.get("Q2").unwrap();
        assert!(!q2.answerable);
        assert_eq!(q2.gold_doc_id, "");
        assert_eq!(q2.query_text(), "only a body");
        assert_eq!(q2.vector.as_deref(), Some(&[0.5, 0.5][..]));

        let q3 = dataset.get("Q3").unwrap();
        assert!(!q3.answerable);
        assert!(q3.vector.is_none());
    }

    #[test]
    fn test_lowercase_answerable_is_not_answerable() {
        let json = r#"[{"QUESTION_ID": "Q1", "ANSWERABLE": "y", "DOCUMENT": "d"}]"#;
        let dataset = QueryDataset::from_reader(json.as_bytes()).unwrap();
        assert_eq!(dataset.get("Q1").unwrap().gold_doc_id, "");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[{"QUESTION_ID": "Q1"}, {"QUESTION_ID": "Q1"}]"#;
        let err = QueryDataset::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateQueryId(id) if id == "Q1"));
    }

    #[test]
    fn test_not_an_array() {
        let json = r#"{"QUESTION_ID": "Q1"}"#;
        assert!(matches!(
            QueryDataset::from_reader(json.as_bytes()),
            Err(DatasetError::Json(_))
        ));
    }
}
