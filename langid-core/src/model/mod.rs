//! Top-level module for the language identification models.
//!
//! - Character n-gram frequency profiles (`FrequencyModel`)
//! - Nearest-profile selection (`Classifier`)
//! - Results of a run (`ClassificationResult`, `Classification`)

/// Character n-gram frequency profile of one corpus.
///
/// Supports concurrent incremental updates and cosine similarity.
pub mod frequency_model;

/// Builds the sample and reference models and selects the closest reference.
///
/// Reference corpora are built in parallel on a bounded pool of threads.
pub mod classifier;

/// Similarity scores and the outcome of a classification run.
pub mod classification;
