use std::sync::Arc;

use serde::Serialize;

use super::frequency_model::FrequencyModel;

/// A reference model paired with its similarity to the unlabeled sample.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
	model: Arc<FrequencyModel>,
	similarity: f64,
}

impl ClassificationResult {
	pub(crate) fn new(model: Arc<FrequencyModel>, similarity: f64) -> Self {
		Self { model, similarity }
	}

	pub fn model(&self) -> &FrequencyModel {
		&self.model
	}

	pub fn label(&self) -> &str {
		self.model.label()
	}

	pub fn similarity(&self) -> f64 {
		self.similarity
	}

	/// Serializable `(label, similarity)` view of this result.
	pub fn score(&self) -> Score {
		Score { label: self.label().to_owned(), similarity: self.similarity }
	}
}

/// Label and similarity of one candidate, as reported to users.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Score {
	pub label: String,
	pub similarity: f64,
}

/// Outcome of a classification run.
///
/// # Invariants
/// - `winner` is one of `results`, the first one holding the maximum similarity
/// - `results` follows the enumeration order of the reference groups
#[derive(Debug, Clone)]
pub struct Classification {
	pub(crate) winner: ClassificationResult,
	pub(crate) results: Vec<ClassificationResult>,
	pub(crate) undefined: Vec<String>,
	pub(crate) skipped_sources: Vec<String>,
}

impl Classification {
	/// Label of the best matching reference language.
	pub fn language(&self) -> &str {
		self.winner.label()
	}

	pub fn winner(&self) -> &ClassificationResult {
		&self.winner
	}

	/// Every defined result, in reference order.
	pub fn results(&self) -> &[ClassificationResult] {
		&self.results
	}

	/// Defined results sorted by decreasing similarity (ties keep reference order).
	pub fn ranking(&self) -> Vec<Score> {
		let mut scores: Vec<Score> = self.results.iter().map(ClassificationResult::score).collect();
		scores.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
		scores
	}

	/// Labels of the references whose similarity was undefined.
	pub fn undefined(&self) -> &[String] {
		&self.undefined
	}

	/// Identifiers of reference sources that could not be read.
	pub fn skipped_sources(&self) -> &[String] {
		&self.skipped_sources
	}
}
