//! # docrank Core
//!
//! Dense and lexical document ranking plus MRR evaluation for technical
//! question answering.
//!
//! This crate holds the ranking and scoring logic shared by the `docrank`
//! and `docrank-eval` command-line tools.
//!
//! ## Modules
//!
//! - [`search`] - Cosine scoring, max-per-document aggregation, top-K selection
//! - [`corpus`] - Chunked, embedded corpus snapshots
//! - [`embedding`] - Encoder trait and a precomputed-vector encoder
//! - [`prediction`] - Ranked candidate lists and the prediction file format
//! - [`evaluation`] - Annotation loading, reciprocal rank, stratified MRR
//! - [`config`] - Defaults and run configuration
//! - [`error`] - Error types for corpus, prediction, dataset and evaluation I/O

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod prediction;
pub mod search;
