use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;

use crate::config::ClassifierConfig;
use crate::error::{LangIdError, LangIdResult};
use crate::io;
use crate::source::{FileSource, ReferenceGroup};

/// On-disk layout of a classification run.
///
/// ```text
/// data/
/// ├── mystery.txt
/// ├── lang-en/
/// │   ├── a.txt
/// │   └── b.txt
/// └── lang-fr/
///     └── a.txt
/// ```
///
/// Names follow the `ClassifierConfig` layout fields.
#[derive(Debug)]
pub struct DataFolder {
	root: PathBuf,
	mystery_file: String,
	language_dir: Regex,
	text_extension: String,
}

impl DataFolder {
	/// Opens a data folder.
	///
	/// # Errors
	/// - `InvalidDataFolder` if `root` does not exist or is not a directory
	/// - `InvalidPattern` if the configured folder pattern is not a valid regex
	pub fn open<P: AsRef<Path>>(root: P, config: &ClassifierConfig) -> LangIdResult<Self> {
		let root = io::normalize_folder(root.as_ref());

		if !root.exists() {
			return Err(LangIdError::InvalidDataFolder { path: root, reason: "folder path does not exist".to_owned() });
		}
		if !root.is_dir() {
			return Err(LangIdError::InvalidDataFolder { path: root, reason: "folder path is not a directory".to_owned() });
		}

		Ok(Self {
			root,
			mystery_file: config.mystery_file().to_owned(),
			language_dir: Regex::new(config.language_dir_pattern())?,
			text_extension: config.text_extension().to_owned(),
		})
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// The unlabeled sample. Its existence is only checked when it is read.
	pub fn mystery(&self) -> FileSource {
		FileSource::new(self.root.join(&self.mystery_file))
	}

	/// Label of a language folder, `None` if `name` does not match the pattern.
	///
	/// The first capture group is the label; a pattern without groups labels
	/// the folder with its whole name.
	pub fn language_label(&self, name: &str) -> Option<String> {
		let captures = self.language_dir.captures(name)?;
		let label = captures.get(1).or_else(|| captures.get(0))?;
		Some(label.as_str().to_owned())
	}

	/// Lists every language folder and its corpus files, sorted by label.
	///
	/// # Errors
	/// Returns `InvalidDataFolder` if the root itself cannot be listed.
	///
	/// # Notes
	/// - A language folder whose files cannot be listed is logged and kept as
	///   an empty group; its similarity will be undefined.
	pub fn reference_groups(&self) -> LangIdResult<Vec<ReferenceGroup>> {
		let dirs = io::list_dirs(&self.root).map_err(|e| LangIdError::InvalidDataFolder {
			path: self.root.clone(),
			reason: e.to_string(),
		})?;

		let mut groups = Vec::new();
		for (name, path) in dirs {
			let Some(label) = self.language_label(&name) else {
				continue;
			};

			let mut group = ReferenceGroup::new(label);
			match io::list_files(&path, &self.text_extension) {
				Ok(files) => {
					debug!("Language folder '{}': {} files", name, files.len());
					for file in files {
						group.push(Box::new(FileSource::new(file)));
					}
				}
				Err(e) => warn!("Cannot list language folder '{}': {}", path.display(), e),
			}
			groups.push(group);
		}

		groups.sort_by(|a, b| a.label().cmp(b.label()));
		Ok(groups)
	}
}
