use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;

use log::{debug, info, warn};

use super::classification::{Classification, ClassificationResult};
use super::frequency_model::{FrequencyModel, UNKNOWN_LABEL};
use crate::config::ClassifierConfig;
use crate::error::{LangIdError, LangIdResult};
use crate::source::{ReferenceGroup, TokenSource};

/// Finished reference models, one per group, in group order.
#[derive(Debug)]
pub struct References {
	models: Vec<Arc<FrequencyModel>>,
	skipped_sources: Vec<String>,
}

impl References {
	pub fn models(&self) -> &[Arc<FrequencyModel>] {
		&self.models
	}

	/// Identifiers of the sources that failed to read, sorted.
	pub fn skipped_sources(&self) -> &[String] {
		&self.skipped_sources
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}
}

/// Nearest-profile language classifier.
///
/// # Responsibilities
/// - Build the model of the unlabeled sample
/// - Build one model per reference group on a bounded worker pool
/// - Rank references by cosine similarity and select the best one
///
/// # Notes
/// - Reference groups are processed and ranked in the order they are given;
///   on equal similarity the first group wins.
#[derive(Debug, Clone)]
pub struct Classifier {
	config: ClassifierConfig,
}

impl Classifier {
	/// Creates a classifier of order `order` with the default configuration.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn new(order: usize) -> LangIdResult<Self> {
		Ok(Self { config: ClassifierConfig::new(order)? })
	}

	pub fn from_config(config: ClassifierConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &ClassifierConfig {
		&self.config
	}

	pub fn order(&self) -> usize {
		self.config.order()
	}

	/// Builds the model of the unlabeled sample.
	///
	/// # Errors
	/// Returns `SourceRead` if the sample cannot be read; this failure is fatal.
	pub fn build_mystery(&self, source: &dyn TokenSource) -> LangIdResult<FrequencyModel> {
		let model = FrequencyModel::new(UNKNOWN_LABEL, self.order())?;
		let tokens = feed(&model, source)?;
		debug!("Mystery sample '{}': {} tokens, {} distinct n-grams", source.id(), tokens, model.distinct_ngrams());
		Ok(model)
	}

	/// Builds exactly one model per group, folding in every source of the group.
	///
	/// # Behavior
	/// - Every `(group, source)` pair is an independent job.
	/// - Jobs are pulled by at most `effective_workers(jobs)` scoped threads
	///   from a shared cursor; sources of one group update the same model
	///   concurrently.
	/// - Returns once every worker has joined.
	///
	/// # Notes
	/// - A source that fails to read is logged and skipped; its group model
	///   reflects the sources that succeeded.
	pub fn build_references(&self, groups: &[ReferenceGroup]) -> LangIdResult<References> {
		let models = groups
			.iter()
			.map(|group| FrequencyModel::new(group.label(), self.order()).map(Arc::new))
			.collect::<LangIdResult<Vec<_>>>()?;

		let jobs: Vec<(usize, &dyn TokenSource)> = groups
			.iter()
			.enumerate()
			.flat_map(|(index, group)| group.sources().iter().map(move |source| (index, &**source)))
			.collect();
		let workers = self.config.effective_workers(jobs.len());
		debug!("Building {} reference models from {} sources on {} workers", groups.len(), jobs.len(), workers);

		let cursor = AtomicUsize::new(0);
		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for _ in 0..workers {
				let tx = tx.clone();
				let (jobs, models, cursor) = (&jobs, &models, &cursor);
				scope.spawn(move || {
					loop {
						let index = cursor.fetch_add(1, Ordering::Relaxed);
						let Some(&(group, source)) = jobs.get(index) else {
							break;
						};
						let outcome = feed(&models[group], source);
						if tx.send((group, outcome)).is_err() {
							break;
						}
					}
				});
			}
		});
		drop(tx);

		let mut skipped_sources = Vec::new();
		for (group, outcome) in rx.iter() {
			match outcome {
				Ok(_) => (),
				Err(LangIdError::SourceRead { source_id, cause }) => {
					warn!("Skipping '{}' for language '{}': {}", source_id, groups[group].label(), cause);
					skipped_sources.push(source_id);
				}
				Err(e) => return Err(e),
			}
		}
		skipped_sources.sort();

		for model in &models {
			debug!("Reference '{}': {} distinct n-grams", model.label(), model.distinct_ngrams());
		}

		Ok(References { models, skipped_sources })
	}

	/// Compares `mystery` against every reference and selects the closest one.
	///
	/// # Behavior
	/// - Similarities are computed in reference order.
	/// - Undefined similarities (empty model on either side) are logged and
	///   excluded from the selection.
	/// - The maximum wins; on a tie the first reference in order is kept.
	///
	/// # Errors
	/// Returns `NoCandidates` if no reference produced a defined similarity.
	pub fn rank(&self, mystery: &FrequencyModel, references: &References) -> LangIdResult<Classification> {
		let mut results = Vec::with_capacity(references.models.len());
		let mut undefined = Vec::new();

		for model in &references.models {
			match mystery.similarity_to(model) {
				Ok(similarity) => {
					debug!("Similarity to '{}': {:.6}", model.label(), similarity);
					results.push(ClassificationResult::new(Arc::clone(model), similarity));
				}
				Err(e @ LangIdError::UndefinedSimilarity { .. }) => {
					warn!("{e}");
					undefined.push(model.label().to_owned());
				}
				Err(e) => return Err(e),
			}
		}

		let winner = select_best(&results).cloned().ok_or(LangIdError::NoCandidates)?;
		info!("Best matched language: {} ({:.6})", winner.label(), winner.similarity());

		Ok(Classification {
			winner,
			results,
			undefined,
			skipped_sources: references.skipped_sources.clone(),
		})
	}

	/// Runs a full classification: sample model, reference models, selection.
	///
	/// # Errors
	/// - `SourceRead` if the sample cannot be read (no reference is processed)
	/// - `NoCandidates` if no reference yields a defined similarity
	pub fn classify(&self, mystery: &dyn TokenSource, groups: &[ReferenceGroup]) -> LangIdResult<Classification> {
		let mystery = self.build_mystery(mystery)?;
		let references = self.build_references(groups)?;
		self.rank(&mystery, &references)
	}
}

/// Feeds every token of `source` into `model`, returning the number of tokens.
fn feed(model: &FrequencyModel, source: &dyn TokenSource) -> LangIdResult<usize> {
	let mut count = 0;
	for token in source.tokens()? {
		model.update(&token);
		count += 1;
	}
	Ok(count)
}

/// First result holding the maximum similarity.
fn select_best(results: &[ClassificationResult]) -> Option<&ClassificationResult> {
	let mut best: Option<&ClassificationResult> = None;
	for result in results {
		match best {
			Some(current) if result.similarity() <= current.similarity() => (),
			_ => best = Some(result),
		}
	}
	best
}
