use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building frequency models or classifying a sample.
///
/// Each variant carries its own recovery policy:
/// - `SourceRead` is fatal for the mystery sample, but only skips the failing
///   source when it belongs to a reference group
/// - `UndefinedSimilarity` excludes one candidate from the selection
/// - `NoCandidates` terminates the run
#[derive(Error, Debug)]
pub enum LangIdError {
	#[error("n-gram order must be a positive integer, got {0}")]
	InvalidOrder(usize),

	#[error("failed to read token source '{source_id}': {cause}")]
	SourceRead {
		source_id: String,
		#[source]
		cause: io::Error,
	},

	#[error("similarity between '{left}' and '{right}' is undefined: a model has zero total frequency")]
	UndefinedSimilarity { left: String, right: String },

	#[error("no reference language produced a defined similarity score")]
	NoCandidates,

	#[error("invalid data folder '{}': {reason}", .path.display())]
	InvalidDataFolder { path: PathBuf, reason: String },

	#[error("invalid language folder pattern: {0}")]
	InvalidPattern(#[from] regex::Error),

	#[error("invalid configuration: {0}")]
	Config(String),
}

impl LangIdError {
	/// Wraps an I/O failure for the source identified by `source_id`.
	pub fn source_read(source_id: impl Into<String>, cause: io::Error) -> Self {
		Self::SourceRead { source_id: source_id.into(), cause }
	}
}

pub type LangIdResult<T> = Result<T, LangIdError>;
