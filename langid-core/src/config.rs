use regex::Regex;

use crate::error::{LangIdError, LangIdResult};

/// Default name of the unlabeled sample inside a data folder.
pub const DEFAULT_MYSTERY_FILE: &str = "mystery.txt";

/// Default pattern of a language folder; the first capture group is the label.
pub const DEFAULT_LANGUAGE_DIR_PATTERN: &str = r"^lang-([a-z]{2})$";

/// Default extension of reference corpus files.
pub const DEFAULT_TEXT_EXTENSION: &str = "txt";

/// Parameters of a classification run.
///
/// `ClassifierConfig` holds both the **model parameters** (n-gram order,
/// worker count) and the **data folder layout** used by `DataFolder`.
///
/// # Invariants
/// - `order` is always >= 1
/// - `mystery_file` and `text_extension` are never empty
/// - `language_dir_pattern` is always a valid regex
/// - `workers == 0` means "use every available core"
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
	/// Length of the n-grams.
	order: usize,

	/// Upper bound on worker threads (0 = number of CPUs).
	pub workers: usize,

	/// Name of the unlabeled sample file.
	mystery_file: String,

	/// Regex matched against sub-folder names to find language corpora.
	language_dir_pattern: String,

	/// Extension (without dot) of corpus files.
	text_extension: String,
}

impl Default for ClassifierConfig {
	fn default() -> Self {
		Self {
			order: 3,
			workers: 0,
			mystery_file: DEFAULT_MYSTERY_FILE.to_owned(),
			language_dir_pattern: DEFAULT_LANGUAGE_DIR_PATTERN.to_owned(),
			text_extension: DEFAULT_TEXT_EXTENSION.to_owned(),
		}
	}
}

impl ClassifierConfig {
	/// Creates a configuration with the default layout and the given order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn new(order: usize) -> LangIdResult<Self> {
		let mut config = Self::default();
		config.set_order(order)?;
		Ok(config)
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Sets the n-gram order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order == 0`.
	pub fn set_order(&mut self, order: usize) -> LangIdResult<()> {
		if order == 0 {
			return Err(LangIdError::InvalidOrder(order));
		}
		self.order = order;
		Ok(())
	}

	pub fn mystery_file(&self) -> &str {
		&self.mystery_file
	}

	/// Sets the name of the unlabeled sample file.
	///
	/// # Errors
	/// Returns `Config` if the name is blank.
	pub fn set_mystery_file(&mut self, name: &str) -> LangIdResult<()> {
		if name.trim().is_empty() {
			return Err(LangIdError::Config("mystery file name cannot be empty".to_owned()));
		}
		self.mystery_file = name.to_owned();
		Ok(())
	}

	pub fn language_dir_pattern(&self) -> &str {
		&self.language_dir_pattern
	}

	/// Sets the pattern of language folder names.
	///
	/// # Errors
	/// Returns `InvalidPattern` if `pattern` is not a valid regex.
	pub fn set_language_dir_pattern(&mut self, pattern: &str) -> LangIdResult<()> {
		Regex::new(pattern)?;
		self.language_dir_pattern = pattern.to_owned();
		Ok(())
	}

	pub fn text_extension(&self) -> &str {
		&self.text_extension
	}

	/// Sets the extension of corpus files; a leading dot is accepted.
	///
	/// # Errors
	/// Returns `Config` if the extension is empty.
	pub fn set_text_extension(&mut self, extension: &str) -> LangIdResult<()> {
		let extension = extension.trim_start_matches('.');
		if extension.is_empty() {
			return Err(LangIdError::Config("text extension cannot be empty".to_owned()));
		}
		self.text_extension = extension.to_owned();
		Ok(())
	}

	/// Number of worker threads to use for `jobs` independent units of work.
	///
	/// Never more than `jobs`, never less than one.
	pub fn effective_workers(&self, jobs: usize) -> usize {
		let limit = if self.workers == 0 { num_cpus::get() } else { self.workers };
		limit.min(jobs).max(1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_layout_matches_data_folder_convention() {
		let config = ClassifierConfig::default();
		assert_eq!(config.mystery_file(), "mystery.txt");
		assert_eq!(config.text_extension(), "txt");
		assert_eq!(config.language_dir_pattern(), r"^lang-([a-z]{2})$");
		assert_eq!(config.workers, 0);
	}

	#[test]
	fn zero_order_is_rejected() {
		assert!(matches!(ClassifierConfig::new(0), Err(LangIdError::InvalidOrder(0))));
		let mut config = ClassifierConfig::new(2).unwrap();
		assert!(config.set_order(0).is_err());
		assert_eq!(config.order(), 2);
	}

	#[test]
	fn extension_dot_is_stripped() {
		let mut config = ClassifierConfig::default();
		config.set_text_extension(".md").unwrap();
		assert_eq!(config.text_extension(), "md");
		assert!(config.set_text_extension(".").is_err());
		assert!(config.set_text_extension("").is_err());
		assert_eq!(config.text_extension(), "md");
	}

	#[test]
	fn blank_mystery_file_is_rejected() {
		let mut config = ClassifierConfig::default();
		assert!(matches!(config.set_mystery_file("  "), Err(LangIdError::Config(_))));
		assert_eq!(config.mystery_file(), "mystery.txt");
		config.set_mystery_file("sample.txt").unwrap();
		assert_eq!(config.mystery_file(), "sample.txt");
	}

	#[test]
	fn invalid_language_pattern_is_rejected() {
		let mut config = ClassifierConfig::default();
		assert!(matches!(config.set_language_dir_pattern("lang-("), Err(LangIdError::InvalidPattern(_))));
		assert_eq!(config.language_dir_pattern(), DEFAULT_LANGUAGE_DIR_PATTERN);
		config.set_language_dir_pattern(r"^[a-z]+$").unwrap();
		assert_eq!(config.language_dir_pattern(), r"^[a-z]+$");
	}

	#[test]
	fn workers_are_bounded_by_jobs() {
		let mut config = ClassifierConfig::default();
		config.workers = 8;
		assert_eq!(config.effective_workers(3), 3);
		assert_eq!(config.effective_workers(20), 8);
		assert_eq!(config.effective_workers(0), 1);
		config.workers = 0;
		assert!(config.effective_workers(usize::MAX) >= 1);
	}
}
