//! Error types for docrank-core.
//!
//! This module defines the error types shared across the core library:
//! corpus loading, prediction exchange, annotation loading, query encoding,
//! evaluation and configuration. Search-time errors live next to the search
//! types in [`crate::search::SearchError`].

use thiserror::Error;

/// Errors that can occur while building, loading or saving a corpus snapshot.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Failed to read or write the snapshot file
    #[error("Corpus I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot is not valid JSON or does not match the schema
    #[error("Corpus parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Snapshot was written by an unknown schema version
    #[error("Unsupported corpus schema version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the snapshot
        found: u32,
        /// Version this build understands
        expected: u32,
    },
    /// A chunk vector does not match the declared dimension
    #[error("Chunk {position} of document '{doc_id}' has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        /// Owning document
        doc_id: String,
        /// Position of the chunk in the snapshot
        position: usize,
        /// Declared corpus dimension
        expected: usize,
        /// Actual vector length
        actual: usize,
    },
    /// A chunk vector has zero or non-finite norm (upstream encoding failure)
    #[error("Chunk {position} of document '{doc_id}' has a zero or non-finite norm")]
    ZeroNorm {
        /// Owning document
        doc_id: String,
        /// Position of the chunk in the snapshot
        position: usize,
    },
    /// Empty document ids are reserved for the no-answer sentinel
    #[error("Chunk {position} has an empty document id")]
    EmptyDocId {
        /// Position of the chunk in the snapshot
        position: usize,
    },
    /// Corpus dimension or chunk size of zero
    #[error("Invalid corpus configuration: {0}")]
    InvalidConfig(String),
    /// The injected encoder failed
    #[error("Encoding failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Errors that can occur while reading, writing or validating predictions.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Failed to read or write the prediction file
    #[error("Prediction I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Prediction file is not valid JSON or lacks the `predictions` object
    #[error("Prediction parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Candidate list is empty (the sentinel entry is required instead)
    #[error("Prediction for '{0}' has no candidates")]
    Empty(String),
    /// Candidate list is longer than the selection cutoff
    #[error("Prediction for '{query_id}' has {len} candidates, limit is {limit}")]
    TooLong {
        /// Query the prediction belongs to
        query_id: String,
        /// Number of candidates
        len: usize,
        /// Configured K
        limit: usize,
    },
    /// Scores increase somewhere in the candidate list
    #[error("Prediction for '{query_id}' is not sorted by score at rank {rank}")]
    NotSorted {
        /// Query the prediction belongs to
        query_id: String,
        /// 1-based rank of the first out-of-order candidate
        rank: usize,
    },
}

/// Errors that can occur while loading the annotation dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to read the annotation file
    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Annotation file is not a JSON array of question records
    #[error("Dataset parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Two records share a question id
    #[error("Duplicate query id '{0}'")]
    DuplicateQueryId(String),
}

/// Errors produced by an [`Encoder`](crate::embedding::Encoder).
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// Text has no entry in a precomputed vector table
    #[error("No vector available for text: {0}")]
    UnknownText(String),
    /// Encoder produced a vector of the wrong length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Encoder's declared dimension
        expected: usize,
        /// Length of the produced vector
        actual: usize,
    },
    /// Vector table could not be read or parsed
    #[error("Invalid vector table: {0}")]
    InvalidTable(String),
}

/// Errors from the evaluation engine.
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    /// Rank cutoff must be at least 1
    #[error("Evaluation cutoff top_k must be >= 1, got {0}")]
    InvalidTopK(usize),
}

/// Errors from configuration validation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

impl From<EvaluationError> for ConfigError {
    fn from(err: EvaluationError) -> Self {
        ConfigError::InvalidValue(err.to_string())
    }
}
