//! Embedded corpus and its on-disk snapshot.
//!
//! A [`Corpus`] holds every chunk vector of every document, validated and
//! immutable. It is built once (from a snapshot file or through an
//! [`Encoder`]) and then shared read-only by all ranking threads.
//!
//! # Snapshot Format
//!
//! ```text
//! {
//!   "version": 1,
//!   "dimension": 768,
//!   "chunks": [
//!     { "doc_id": "swg21600000", "chunk_index": 0, "vector": [0.01, ...] },
//!     { "doc_id": "swg21600000", "chunk_index": 1, "vector": [...] },
//!     ...
//!   ]
//! }
//! ```
//!
//! Loading checks the version, the length of every vector, empty document
//! ids and zero-norm vectors before any query is scored.

pub mod chunking;

pub use chunking::CharChunks;

use crate::config::CORPUS_SCHEMA_VERSION;
use crate::embedding::Encoder;
use crate::error::{CorpusError, EmbeddingError};
use crate::search::similarity::l2_norm;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, instrument};

/// One embedded slice of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusChunk {
    /// Owning document
    pub doc_id: String,
    /// Position of the chunk within its document, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    /// Embedding vector
    pub vector: Vec<f32>,
}

impl CorpusChunk {
    /// Creates a chunk without a chunk index.
    pub fn new(doc_id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            doc_id: doc_id.into(),
            chunk_index: None,
            vector,
        }
    }

    /// Creates a chunk with an explicit index within its document.
    pub fn with_index(doc_id: impl Into<String>, chunk_index: u32, vector: Vec<f32>) -> Self {
        Self {
            doc_id: doc_id.into(),
            chunk_index: Some(chunk_index),
            vector,
        }
    }
}

/// Serialized form of a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    /// Schema version; must equal [`CORPUS_SCHEMA_VERSION`]
    pub version: u32,
    /// Length of every chunk vector
    pub dimension: usize,
    /// All chunks in corpus order
    pub chunks: Vec<CorpusChunk>,
}

/// Validated, immutable set of chunk vectors.
#[derive(Debug, Clone)]
pub struct Corpus {
    dimension: usize,
    chunks: Vec<CorpusChunk>,
    /// L2 norm of each chunk, parallel to `chunks`
    norms: Vec<f64>,
}

impl Corpus {
    /// Builds a corpus from chunks, validating every vector.
    ///
    /// # Errors
    ///
    /// - `CorpusError::InvalidConfig` if `dimension` is zero
    /// - `CorpusError::EmptyDocId` if a chunk has an empty document id
    /// - `CorpusError::DimensionMismatch` if a vector has the wrong length
    /// - `CorpusError::ZeroNorm` if a vector has zero or non-finite norm
    pub fn new(dimension: usize, chunks: Vec<CorpusChunk>) -> Result<Self, CorpusError> {
        if dimension == 0 {
            return Err(CorpusError::InvalidConfig(
                "corpus dimension must be >= 1".into(),
            ));
        }

        let mut norms = Vec::with_capacity(chunks.len());
        for (position, chunk) in chunks.iter().enumerate() {
            if chunk.doc_id.is_empty() {
                return Err(CorpusError::EmptyDocId { position });
            }
            if chunk.vector.len() != dimension {
                return Err(CorpusError::DimensionMismatch {
                    doc_id: chunk.doc_id.clone(),
                    position,
                    expected: dimension,
                    actual: chunk.vector.len(),
                });
            }
            let norm = l2_norm(&chunk.vector);
            if norm == 0.0 || !norm.is_finite() {
                return Err(CorpusError::ZeroNorm {
                    doc_id: chunk.doc_id.clone(),
                    position,
                });
            }
            norms.push(norm);
        }

        Ok(Self {
            dimension,
            chunks,
            norms,
        })
    }

    /// Validates a deserialized snapshot and builds the corpus.
    pub fn from_snapshot(snapshot: CorpusSnapshot) -> Result<Self, CorpusError> {
        if snapshot.version != CORPUS_SCHEMA_VERSION {
            return Err(CorpusError::UnsupportedVersion {
                found: snapshot.version,
                expected: CORPUS_SCHEMA_VERSION,
            });
        }
        Self::new(snapshot.dimension, snapshot.chunks)
    }

    /// Parses and validates a snapshot from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CorpusError> {
        let snapshot: CorpusSnapshot = serde_json::from_reader(reader)?;
        Self::from_snapshot(snapshot)
    }

    /// Loads and validates a snapshot file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let file = File::open(path.as_ref())?;
        let corpus = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded corpus: {} chunks, {} documents, dim {}",
            corpus.len(),
            corpus.document_count(),
            corpus.dimension
        );
        Ok(corpus)
    }

    /// Returns a snapshot of this corpus at the current schema version.
    pub fn to_snapshot(&self) -> CorpusSnapshot {
        CorpusSnapshot {
            version: CORPUS_SCHEMA_VERSION,
            dimension: self.dimension,
            chunks: self.chunks.clone(),
        }
    }

    /// Writes the snapshot as JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), CorpusError> {
        serde_json::to_writer(writer, &self.to_snapshot())?;
        Ok(())
    }

    /// Writes the snapshot to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CorpusError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Vector dimension shared by all chunks.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if the corpus has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All chunks in corpus order.
    pub fn chunks(&self) -> &[CorpusChunk] {
        &self.chunks
    }

    /// Iterates chunks together with their cached norms.
    pub fn chunks_with_norms(&self) -> impl Iterator<Item = (&CorpusChunk, f64)> {
        self.chunks.iter().zip(self.norms.iter().copied())
    }

    /// Number of chunks owned by each document.
    pub fn chunk_counts(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for chunk in &self.chunks {
            *counts.entry(chunk.doc_id.as_str()).or_default() += 1;
        }
        counts
    }

    /// Number of distinct documents.
    pub fn document_count(&self) -> usize {
        self.chunk_counts().len()
    }
}

/// Splits documents into fixed-size chunks and embeds each chunk.
///
/// Every document yields at least one chunk (an empty text becomes one empty
/// chunk), and chunk indices count from zero within each document.
///
/// # Errors
///
/// Returns `CorpusError::Embedding` if the encoder fails or produces a vector
/// of the wrong length, and the [`Corpus::new`] validation errors.
#[instrument(skip_all, fields(chunk_chars = chunk_chars))]
pub fn build_corpus<I>(
    encoder: &dyn Encoder,
    documents: I,
    chunk_chars: usize,
) -> Result<Corpus, CorpusError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let dimension = encoder.embedding_dim();
    let mut chunks = Vec::new();
    let mut doc_count = 0usize;

    for (doc_id, text) in documents {
        for (index, slice) in CharChunks::new(&text, chunk_chars)?.enumerate() {
            let vector = encoder.encode(slice)?;
            if vector.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                }
                .into());
            }
            let index = u32::try_from(index).map_err(|_| {
                CorpusError::InvalidConfig(format!("document '{}' has too many chunks", doc_id))
            })?;
            chunks.push(CorpusChunk::with_index(doc_id.clone(), index, vector));
        }
        doc_count += 1;
    }

    debug!("Embedded {} documents into {} chunks", doc_count, chunks.len());
    Corpus::new(dimension, chunks)
}
