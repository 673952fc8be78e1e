//! Ranking and evaluation configuration.
//!
//! Defaults match the TechQA baselines: the lexical engine returns ten hits
//! per query and the evaluation script scores the top ten.
//!
//! # Usage
//!
//! ```
//! use docrank_core::config::{EvalConfig, RankConfig, DEFAULT_SELECTION_K};
//!
//! let rank = RankConfig::default();
//! assert_eq!(rank.k, DEFAULT_SELECTION_K);
//! assert!(rank.validate().is_ok());
//!
//! // Selection K and evaluation top_k are independent
//! let eval = EvalConfig { top_k: 5 };
//! assert!(eval.validate().is_ok());
//! ```

use crate::error::ConfigError;

// =============================================================================
// Defaults
// =============================================================================

/// Number of candidates kept per query by the top-K selector.
pub const DEFAULT_SELECTION_K: usize = 10;

/// Rank cutoff used when computing reciprocal rank.
pub const DEFAULT_EVAL_TOP_K: usize = 10;

/// Characters per chunk when splitting documents for the encoder.
///
/// Context encoders accept at most 512 positions; slicing by characters keeps
/// every chunk under that limit for typical English text.
pub const DEFAULT_CHUNK_CHARS: usize = 512;

/// Schema version written into corpus snapshots.
pub const CORPUS_SCHEMA_VERSION: u32 = 1;

/// Returns the number of worker threads to use when none is configured.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// =============================================================================
// Config structs
// =============================================================================

/// Configuration for the retrieval side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankConfig {
    /// Maximum candidates per prediction.
    pub k: usize,
    /// Threads used by [`RetrievalEngine::rank_batch`](crate::search::RetrievalEngine::rank_batch).
    pub workers: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_SELECTION_K,
            workers: default_workers(),
        }
    }
}

impl RankConfig {
    /// Creates a config with the given K and the default worker count.
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::InvalidValue("k must be >= 1".into()));
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue("workers must be >= 1".into()));
        }
        Ok(())
    }
}

/// Configuration for the evaluation side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Only the first `top_k` candidates of each prediction are scanned.
    pub top_k: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_EVAL_TOP_K,
        }
    }
}

impl EvalConfig {
    /// Validates config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue("top_k must be >= 1".into()));
        }
        Ok(())
    }
}
