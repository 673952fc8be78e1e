//! Ranked predictions and the prediction exchange format.
//!
//! A [`Prediction`] is the ranked answer list for one query. The retrieval
//! side produces it; the evaluation side reads it. On disk, predictions for a
//! whole run are exchanged as:
//!
//! ```text
//! { "predictions": {
//!     "<query_id>": [ { "doc_id": "<string>", "score": <number> }, ... ],
//!     ...
//! } }
//! ```
//!
//! Every list is non-empty and sorted by descending score. A query for which
//! retrieval found nothing carries the single sentinel entry
//! `{ "doc_id": "", "score": 0 }`.

use crate::error::PredictionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// One ranked candidate document.
///
/// Missing fields deserialize to the sentinel values, so `{}` reads as
/// `{ "doc_id": "", "score": 0 }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedDocument {
    /// Candidate document id; empty for the no-answer sentinel
    #[serde(default)]
    pub doc_id: String,
    /// Relevance score
    #[serde(default)]
    pub score: f64,
}

impl RankedDocument {
    /// Creates a ranked document.
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self {
            doc_id: doc_id.into(),
            score,
        }
    }

    /// The `{ doc_id: "", score: 0 }` entry asserting "no answer found".
    pub fn no_answer() -> Self {
        Self::default()
    }

    /// Returns true for an entry with an empty document id.
    pub fn is_no_answer(&self) -> bool {
        self.doc_id.is_empty()
    }
}

/// Ranked answer list for a single query.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Query this prediction answers
    pub query_id: String,
    /// Candidates in rank order (rank 1 first)
    pub candidates: Vec<RankedDocument>,
}

impl Prediction {
    /// Creates a prediction from already-ranked candidates.
    pub fn new(query_id: impl Into<String>, candidates: Vec<RankedDocument>) -> Self {
        Self {
            query_id: query_id.into(),
            candidates,
        }
    }

    /// Creates the sentinel prediction for a query with no candidates.
    pub fn no_answer(query_id: impl Into<String>) -> Self {
        Self::new(query_id, vec![RankedDocument::no_answer()])
    }

    /// Returns true if this is exactly the single-entry sentinel.
    pub fn is_no_answer(&self) -> bool {
        matches!(self.candidates.as_slice(), [only] if only.is_no_answer() && only.score == 0.0)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if the candidate list is empty.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the first `k` candidates (or all of them if fewer).
    pub fn top(&self, k: usize) -> &[RankedDocument] {
        &self.candidates[..k.min(self.candidates.len())]
    }

    /// Checks the prediction invariants: non-empty, at most `k` entries,
    /// scores non-increasing.
    pub fn validate(&self, k: usize) -> Result<(), PredictionError> {
        if self.candidates.is_empty() {
            return Err(PredictionError::Empty(self.query_id.clone()));
        }
        if self.candidates.len() > k {
            return Err(PredictionError::TooLong {
                query_id: self.query_id.clone(),
                len: self.candidates.len(),
                limit: k,
            });
        }
        if let Some(pos) = self
            .candidates
            .windows(2)
            .position(|pair| pair[1].score > pair[0].score)
        {
            return Err(PredictionError::NotSorted {
                query_id: self.query_id.clone(),
                rank: pos + 2,
            });
        }
        Ok(())
    }
}

/// Predictions for a whole run, keyed by query id.
///
/// Serializes to the exchange format described in the module docs. Keys are
/// kept sorted so written files are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    predictions: BTreeMap<String, Vec<RankedDocument>>,
}

impl PredictionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the prediction for its query.
    pub fn insert(&mut self, prediction: Prediction) {
        self.predictions
            .insert(prediction.query_id, prediction.candidates);
    }

    /// Returns the candidate list for a query, if present.
    pub fn get(&self, query_id: &str) -> Option<&[RankedDocument]> {
        self.predictions.get(query_id).map(Vec::as_slice)
    }

    /// Returns the prediction for a query as an owned [`Prediction`].
    pub fn prediction(&self, query_id: &str) -> Option<Prediction> {
        self.predictions
            .get(query_id)
            .map(|candidates| Prediction::new(query_id, candidates.clone()))
    }

    /// Returns true if the set holds a prediction for `query_id`.
    pub fn contains(&self, query_id: &str) -> bool {
        self.predictions.contains_key(query_id)
    }

    /// Number of queries with a prediction.
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// Iterates `(query_id, candidates)` in query id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RankedDocument])> {
        self.predictions
            .iter()
            .map(|(id, candidates)| (id.as_str(), candidates.as_slice()))
    }

    /// Number of predictions that are exactly the no-answer sentinel.
    pub fn no_answer_count(&self) -> usize {
        self.predictions
            .values()
            .filter(|c| matches!(c.as_slice(), [only] if only.is_no_answer() && only.score == 0.0))
            .count()
    }

    /// Parses a prediction file from a reader.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError::Json` if the input is not valid JSON or has
    /// no `predictions` object.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PredictionError> {
        let set: Self = serde_json::from_reader(reader)?;
        debug!("Parsed predictions for {} queries", set.len());
        Ok(set)
    }

    /// Loads a prediction file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictionError> {
        let path = path.as_ref();
        debug!("Loading predictions from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Writes the set as compact JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), PredictionError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Renders the set as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, PredictionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the set to a file as compact JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PredictionError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl FromIterator<Prediction> for PredictionSet {
    fn from_iter<I: IntoIterator<Item = Prediction>>(iter: I) -> Self {
        let mut set = Self::new();
        for prediction in iter {
            set.insert(prediction);
        }
        set
    }
}
