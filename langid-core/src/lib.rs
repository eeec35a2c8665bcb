//! Character n-gram language identification library.
//!
//! This crate identifies the language of an unlabeled text by comparing its
//! character n-gram frequency profile against reference profiles, using
//! cosine similarity. It provides:
//! - Concurrent character n-gram frequency models
//! - A classifier building one model per reference language on a bounded
//!   worker pool and selecting the closest one
//! - Token sources (files, raw text, pre-cleaned words) and tokenization
//! - Discovery of the `mystery.txt` / `lang-xx/` data folder layout

/// Frequency models, classification results and the classifier.
pub mod model;

/// Run parameters and data folder layout.
pub mod config;

/// Discovery of the sample and reference corpora in a data folder.
pub mod corpus;

/// Error taxonomy shared by the whole crate.
pub mod error;

/// Token sources consumed by the models.
pub mod source;

/// Tokenization and file system helpers.
///
/// Only `tokenize` and `normalize_folder` are public.
pub mod io;

pub use config::ClassifierConfig;
pub use corpus::DataFolder;
pub use error::{LangIdError, LangIdResult};
pub use model::classification::{Classification, ClassificationResult, Score};
pub use model::classifier::{Classifier, References};
pub use model::frequency_model::{FrequencyModel, UNKNOWN_LABEL};
pub use source::{FileSource, ReferenceGroup, TextSource, TokenList, TokenSource};
