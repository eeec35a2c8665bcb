use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{LangIdError, LangIdResult};

/// Label given to the model built from the unlabeled sample.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Character n-gram frequency profile of one corpus.
///
/// The `FrequencyModel` counts every contiguous substring of `order`
/// characters seen in the tokens fed to it, and compares itself to other
/// profiles with cosine similarity.
///
/// # Responsibilities
/// - Accumulate n-gram counts from tokens, possibly from many threads at once
/// - Expose the primitives of the frequency vector (item count, squared norm)
/// - Compute the cosine similarity against another profile
///
/// # Invariants
/// - `order` is always >= 1
/// - Every key in `counts` is exactly `order` characters long
/// - Counts never decrease
#[derive(Debug)]
pub struct FrequencyModel {
	/// Corpus identifier (a language, or `UNKNOWN_LABEL`)
	label: String,

	/// Length of each n-gram, in characters
	order: usize,

	/// Mapping from n-gram to its number of occurrences.
	/// Guarded as a whole so that every update is applied atomically.
	counts: Mutex<HashMap<String, u64>>,
}

impl FrequencyModel {
	/// Creates an empty model of order `order` for the corpus `label`.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn new(label: impl Into<String>, order: usize) -> LangIdResult<Self> {
		if order == 0 {
			return Err(LangIdError::InvalidOrder(order));
		}
		Ok(Self { label: label.into(), order, counts: Mutex::new(HashMap::new()) })
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Adds every n-gram of `token` to the model.
	///
	/// Tokens shorter than `order` contribute nothing.
	///
	/// # Notes
	/// - UTF-8 safe: n-grams are cut on characters, not bytes.
	/// - The n-grams are extracted before the lock is taken; all increments of
	///   one call are then applied under a single lock acquisition.
	pub fn update(&self, token: &str) {
		let chars: Vec<char> = token.chars().collect();
		if chars.len() < self.order {
			return;
		}

		let ngrams: Vec<String> = chars
			.windows(self.order)
			.map(|window| window.iter().collect())
			.collect();

		let mut counts = self.lock();
		for ngram in ngrams {
			*counts.entry(ngram).or_insert(0) += 1;
		}
	}

	/// Returns the number of occurrences of `ngram`, zero if it was never seen.
	pub fn item_frequency(&self, ngram: &str) -> u64 {
		self.lock().get(ngram).copied().unwrap_or(0)
	}

	/// Sum over all n-grams of count², i.e. the squared norm of the frequency vector.
	pub fn sum_of_squared_frequencies(&self) -> u64 {
		sum_of_squares(&self.lock())
	}

	/// Number of distinct n-grams seen so far.
	pub fn distinct_ngrams(&self) -> usize {
		self.lock().len()
	}

	/// Total number of n-gram occurrences seen so far.
	pub fn total_ngrams(&self) -> u64 {
		self.lock().values().sum()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	/// Returns every `(ngram, count)` pair, sorted by n-gram.
	pub fn snapshot(&self) -> Vec<(String, u64)> {
		let mut items: Vec<(String, u64)> = self
			.lock()
			.iter()
			.map(|(ngram, count)| (ngram.clone(), *count))
			.collect();
		items.sort_unstable_by(|a, b| a.0.cmp(&b.0));
		items
	}

	/// Cosine similarity between this model's frequency vector and `other`'s.
	///
	/// The dot product only enumerates this model's n-grams: an n-gram absent
	/// here contributes zero whatever its count in `other`. Both the dot
	/// product and the squared norms are summed exactly in integers, so the
	/// result is symmetric and independent of map iteration order.
	///
	/// # Errors
	/// Returns `UndefinedSimilarity` if either model has zero total frequency.
	///
	/// # Notes
	/// - The result always lies in [0, 1].
	/// - Comparing a model with itself is allowed.
	/// - When two distinct models are locked together, they are locked in
	///   address order, so `a.similarity_to(b)` and `b.similarity_to(a)` may
	///   run concurrently.
	pub fn similarity_to(&self, other: &Self) -> LangIdResult<f64> {
		let (dot, own_norm, other_norm) = if std::ptr::eq(self, other) {
			let counts = self.lock();
			let norm = sum_of_squares(&counts);
			(norm, norm, norm)
		} else {
			let (mine, theirs) = self.lock_with(other);
			let dot: u64 = mine
				.iter()
				.map(|(ngram, count)| count * theirs.get(ngram).copied().unwrap_or(0))
				.sum();
			(dot, sum_of_squares(&mine), sum_of_squares(&theirs))
		};

		if own_norm == 0 || other_norm == 0 {
			return Err(LangIdError::UndefinedSimilarity {
				left: self.label.clone(),
				right: other.label.clone(),
			});
		}

		// One square root of the product keeps self-similarity at exactly 1.0
		// while the product fits in an f64 mantissa; the clamp covers the rest.
		let norms = ((own_norm as f64) * (other_norm as f64)).sqrt();
		Ok((dot as f64 / norms).min(1.0))
	}

	/// Locks the count map.
	///
	/// A poisoned lock is recovered: every increment is a single map write,
	/// so a panicking holder cannot leave a half-applied count behind.
	fn lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
		self.counts.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Locks `self` and `other` (which must be distinct) in address order.
	fn lock_with<'a>(
		&'a self,
		other: &'a Self,
	) -> (MutexGuard<'a, HashMap<String, u64>>, MutexGuard<'a, HashMap<String, u64>>) {
		if (self as *const Self) < (other as *const Self) {
			let mine = self.lock();
			let theirs = other.lock();
			(mine, theirs)
		} else {
			let theirs = other.lock();
			let mine = self.lock();
			(mine, theirs)
		}
	}
}

fn sum_of_squares(counts: &HashMap<String, u64>) -> u64 {
	counts.values().map(|count| count * count).sum()
}

impl fmt::Display for FrequencyModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let snapshot = self.snapshot();
		writeln!(f, "Lang: {}", self.label)?;
		writeln!(f, "ItemCount: {}", snapshot.len())?;
		writeln!(f, "FreqDist:")?;
		let items: Vec<String> = snapshot
			.iter()
			.map(|(ngram, count)| format!("{ngram}={count}"))
			.collect();
		write!(f, "{{{}}}", items.join(", "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::thread;

	fn model_from(label: &str, order: usize, tokens: &[&str]) -> FrequencyModel {
		let model = FrequencyModel::new(label, order).unwrap();
		for token in tokens {
			model.update(token);
		}
		model
	}

	#[test]
	fn rejects_zero_order() {
		assert!(matches!(FrequencyModel::new("en", 0), Err(LangIdError::InvalidOrder(0))));
	}

	#[test]
	fn update_counts_overlapping_bigrams() {
		let model = model_from("en", 2, &["banana"]);
		assert_eq!(
			model.snapshot(),
			vec![("an".to_string(), 2), ("ba".to_string(), 1), ("na".to_string(), 2)]
		);
		assert_eq!(model.total_ngrams(), 5);
	}

	#[test]
	fn update_adds_len_minus_order_plus_one_occurrences() {
		let model = model_from("en", 3, &["language"]);
		assert_eq!(model.total_ngrams(), 6);
		assert!(model.snapshot().iter().all(|(ngram, _)| ngram.chars().count() == 3));
	}

	#[test]
	fn short_tokens_are_ignored() {
		let model = model_from("en", 4, &["cat", "", "a"]);
		assert!(model.is_empty());
		assert_eq!(model.sum_of_squared_frequencies(), 0);
	}

	#[test]
	fn ngrams_are_cut_on_characters() {
		let model = model_from("fr", 2, &["été"]);
		assert_eq!(model.item_frequency("ét"), 1);
		assert_eq!(model.item_frequency("té"), 1);
		assert_eq!(model.distinct_ngrams(), 2);
	}

	#[test]
	fn item_frequency_is_stable_between_updates() {
		let model = model_from("en", 2, &["banana"]);
		assert_eq!(model.item_frequency("an"), 2);
		assert_eq!(model.item_frequency("an"), 2);
		assert_eq!(model.item_frequency("zz"), 0);
		model.update("an");
		assert_eq!(model.item_frequency("an"), 3);
	}

	#[test]
	fn sum_of_squares_matches_counts() {
		let model = model_from("en", 2, &["banana"]);
		assert_eq!(model.sum_of_squared_frequencies(), 1 + 4 + 4);
	}

	#[test]
	fn self_similarity_is_one() {
		let model = model_from("en", 2, &["the", "quick", "brown", "fox"]);
		assert_eq!(model.similarity_to(&model).unwrap(), 1.0);
	}

	#[test]
	fn self_similarity_is_exact_for_odd_norms() {
		// |v|² = 3, where sqrt(3) * sqrt(3) rounds above 3
		let model = model_from("en", 1, &["abc"]);
		assert_eq!(model.sum_of_squared_frequencies(), 3);
		assert_eq!(model.similarity_to(&model).unwrap(), 1.0);

		let copy = model_from("copy", 1, &["cab"]);
		assert_eq!(model.similarity_to(&copy).unwrap(), 1.0);
		assert_eq!(copy.similarity_to(&model).unwrap(), 1.0);
	}

	#[test]
	fn similarity_never_exceeds_one() {
		for tokens in [&["abc"][..], &["a", "bb", "ccc"], &["language", "identification"], &["x"; 7]] {
			let a = model_from("a", 1, tokens);
			let b = model_from("b", 1, tokens);
			let similarity = a.similarity_to(&b).unwrap();
			assert!(similarity <= 1.0, "{tokens:?} gave {similarity}");
			assert!(similarity >= 0.0);
		}
	}

	#[test]
	fn similarity_is_symmetric_and_bounded() {
		let a = model_from("a", 2, &["the", "cat", "sat"]);
		let b = model_from("b", 2, &["a", "hat", "that", "cat"]);
		let ab = a.similarity_to(&b).unwrap();
		let ba = b.similarity_to(&a).unwrap();
		assert!((ab - ba).abs() < 1e-12);
		assert!((0.0..=1.0).contains(&ab));
	}

	#[test]
	fn disjoint_models_have_zero_similarity() {
		let a = model_from("a", 1, &["abc"]);
		let b = model_from("b", 1, &["xyz"]);
		assert_eq!(a.similarity_to(&b).unwrap(), 0.0);
	}

	#[test]
	fn empty_model_similarity_is_undefined() {
		let empty = model_from("empty", 3, &["ab"]);
		let full = model_from("full", 3, &["abcdef"]);
		assert!(matches!(
			empty.similarity_to(&full),
			Err(LangIdError::UndefinedSimilarity { .. })
		));
		assert!(matches!(
			full.similarity_to(&empty),
			Err(LangIdError::UndefinedSimilarity { .. })
		));
		assert!(matches!(
			empty.similarity_to(&empty),
			Err(LangIdError::UndefinedSimilarity { .. })
		));
	}

	#[test]
	fn opposite_comparisons_run_concurrently() {
		let a = Arc::new(model_from("a", 2, &["parallel", "threads"]));
		let b = Arc::new(model_from("b", 2, &["mutex", "threads"]));

		let handles: Vec<_> = (0..8)
			.map(|i| {
				let (a, b) = (Arc::clone(&a), Arc::clone(&b));
				thread::spawn(move || {
					for _ in 0..200 {
						if i % 2 == 0 {
							a.similarity_to(&b).unwrap();
						} else {
							b.similarity_to(&a).unwrap();
						}
					}
				})
			})
			.collect();

		for handle in handles {
			handle.join().unwrap();
		}
	}

	#[test]
	fn display_lists_sorted_distribution() {
		let model = model_from("en", 2, &["banana"]);
		assert_eq!(model.to_string(), "Lang: en\nItemCount: 3\nFreqDist:\n{an=2, ba=1, na=2}");
	}
}
