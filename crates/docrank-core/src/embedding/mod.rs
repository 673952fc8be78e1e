//! Query and passage encoders.
//!
//! The neural encoder is an external collaborator. The ranking core only
//! needs vectors, so the encoder is modelled as a trait that callers construct
//! once and pass by reference wherever text has to be turned into a vector.
//!
//! [`PrecomputedEncoder`] serves vectors from a table computed offline, which
//! is how the command-line tools run without loading a model.

use crate::error::EmbeddingError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Trait for turning text into fixed-length embedding vectors.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one encoder is shared by every
/// worker thread of a ranking run.
///
/// # Examples
///
/// ```
/// use docrank_core::embedding::{Encoder, PrecomputedEncoder};
///
/// let encoder = PrecomputedEncoder::from_pairs(
///     2,
///     vec![("installing db2".to_string(), vec![0.6, 0.8])],
/// )
/// .unwrap();
///
/// assert_eq!(encoder.embedding_dim(), 2);
/// assert_eq!(encoder.encode("installing db2").unwrap(), vec![0.6, 0.8]);
/// ```
pub trait Encoder: Send + Sync {
    /// Returns the embedding dimension (vector size).
    fn embedding_dim(&self) -> usize;

    /// Encodes one text.
    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Encodes several texts. The default calls [`Encoder::encode`] in order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }
}

/// One row of a precomputed vector table.
#[derive(Debug, Deserialize)]
struct VectorRow {
    text: String,
    vector: Vec<f32>,
}

/// Encoder backed by an in-memory `text -> vector` table.
#[derive(Debug, Clone)]
pub struct PrecomputedEncoder {
    dimension: usize,
    table: HashMap<String, Vec<f32>>,
}

impl PrecomputedEncoder {
    /// Builds an encoder from `(text, vector)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::DimensionMismatch` if any vector does not have
    /// `dimension` elements.
    pub fn from_pairs<I>(dimension: usize, pairs: I) -> Result<Self, EmbeddingError>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut table = HashMap::new();
        for (text, vector) in pairs {
            if vector.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            table.insert(text, vector);
        }
        Ok(Self { dimension, table })
    }

    /// Reads a JSONL table of `{"text": ..., "vector": [...]}` rows.
    ///
    /// The dimension is taken from the first row; every other row must match.
    pub fn from_jsonl_reader<R: Read>(reader: R) -> Result<Self, EmbeddingError> {
        let mut pairs = Vec::new();
        for (line_num, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| EmbeddingError::InvalidTable(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let row: VectorRow = serde_json::from_str(&line).map_err(|e| {
                EmbeddingError::InvalidTable(format!("Line {}: {}", line_num + 1, e))
            })?;
            pairs.push((row.text, row.vector));
        }

        let dimension = pairs
            .first()
            .map(|(_, v)| v.len())
            .ok_or_else(|| EmbeddingError::InvalidTable("table has no rows".into()))?;
        Self::from_pairs(dimension, pairs)
    }

    /// Loads a JSONL vector table from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| EmbeddingError::InvalidTable(format!("{}: {}", path.display(), e)))?;
        let encoder = Self::from_jsonl_reader(file)?;
        debug!(
            "Loaded {} precomputed vectors (dim {}) from {}",
            encoder.len(),
            encoder.dimension,
            path.display()
        );
        Ok(encoder)
    }

    /// Number of texts in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Encoder for PrecomputedEncoder {
    fn embedding_dim(&self) -> usize {
        self.dimension
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::UnknownText(text.to_string()))
    }
}
