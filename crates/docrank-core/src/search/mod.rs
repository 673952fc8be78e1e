//! Retrieval ranking: scoring, aggregation and top-K selection.
//!
//! # Architecture
//!
//! - `types`: Core types (ScoredCandidate, DocumentScore, SearchError)
//! - `similarity`: Cosine similarity between query and chunk vectors
//! - `aggregation`: Max-per-document aggregation of chunk scores
//! - `selection`: Stable top-K selection with the no-answer sentinel
//! - `engine`: RetrievalEngine tying the three together over a shared corpus
//! - `lexical`: Loader for scores produced by an external lexical engine
//!
//! # Data Flow
//!
//! ```text
//! query vector ──► similarity ──► (chunk, score) ──► aggregation ──► (doc, max score)
//!                                      ▲                                  │
//! lexical hits ────────────────────────┘                                  ▼
//!                                                             selection ──► Prediction
//! ```
//!
//! # Usage
//!
//! ```
//! use docrank_core::search::{rank_candidates, ScoredCandidate};
//!
//! // Two chunks of D5 and one of D2, as scored by any backend
//! let prediction = rank_candidates(
//!     "q1",
//!     vec![
//!         ScoredCandidate::new("D5", 0.3),
//!         ScoredCandidate::new("D2", 0.5),
//!         ScoredCandidate::new("D5", 0.8),
//!     ],
//!     10,
//! )
//! .unwrap();
//!
//! assert_eq!(prediction.candidates[0].doc_id, "D5");
//! assert_eq!(prediction.candidates[0].score, 0.8);
//! ```

pub mod types;

mod aggregation;
mod engine;
pub mod lexical;
mod selection;
pub mod similarity;

pub use types::{
    validate_dimension, DocumentScore, Operand, ScoredCandidate, SearchError,
};

pub use aggregation::DocumentScores;
pub use engine::{QueryVector, RetrievalEngine};
pub use lexical::{load_lexical_hits, read_lexical_hits, LexicalHits};
pub use selection::{rank_candidates, select_top_k};
pub use similarity::cosine_similarity;
