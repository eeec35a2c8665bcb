use std::path::{Path, PathBuf};

use crate::error::{LangIdError, LangIdResult};
use crate::io;

/// Lazy sequence of cleaned words produced by a `TokenSource`.
pub type Tokens<'a> = Box<dyn Iterator<Item = String> + Send + 'a>;

/// Anything that yields pre-cleaned words (lowercase, punctuation removed).
///
/// Sources are shared between the worker threads of a classification run,
/// hence the `Send + Sync` bound.
pub trait TokenSource: Send + Sync {
	/// Identifier used in logs and error reports (ex. a file path).
	fn id(&self) -> &str;

	/// Opens the source and returns its words.
	///
	/// # Errors
	/// Returns `SourceRead` if the underlying data cannot be read.
	fn tokens(&self) -> LangIdResult<Tokens<'_>>;
}

/// Words of a text file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
	path: PathBuf,
	id: String,
}

impl FileSource {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		let path = path.as_ref().to_path_buf();
		let id = path.display().to_string();
		Self { path, id }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl TokenSource for FileSource {
	fn id(&self) -> &str {
		&self.id
	}

	fn tokens(&self) -> LangIdResult<Tokens<'_>> {
		let words = io::read_tokens(&self.path).map_err(|e| LangIdError::source_read(&self.id, e))?;
		Ok(Box::new(words.into_iter()))
	}
}

/// Raw in-memory text, tokenized on demand.
#[derive(Debug, Clone)]
pub struct TextSource {
	id: String,
	text: String,
}

impl TextSource {
	pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
		Self { id: id.into(), text: text.into() }
	}
}

impl TokenSource for TextSource {
	fn id(&self) -> &str {
		&self.id
	}

	fn tokens(&self) -> LangIdResult<Tokens<'_>> {
		Ok(Box::new(io::tokenize(&self.text).into_iter()))
	}
}

/// Words that are already cleaned, used as-is.
#[derive(Debug, Clone)]
pub struct TokenList {
	id: String,
	words: Vec<String>,
}

impl TokenList {
	pub fn new<I, S>(id: impl Into<String>, words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { id: id.into(), words: words.into_iter().map(Into::into).collect() }
	}
}

impl TokenSource for TokenList {
	fn id(&self) -> &str {
		&self.id
	}

	fn tokens(&self) -> LangIdResult<Tokens<'_>> {
		Ok(Box::new(self.words.iter().cloned()))
	}
}

/// One candidate language: a label and the sources of its reference corpus.
pub struct ReferenceGroup {
	label: String,
	sources: Vec<Box<dyn TokenSource>>,
}

impl ReferenceGroup {
	pub fn new(label: impl Into<String>) -> Self {
		Self { label: label.into(), sources: Vec::new() }
	}

	/// Appends a source; sources keep their insertion order.
	pub fn with_source<S: TokenSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	pub fn push(&mut self, source: Box<dyn TokenSource>) {
		self.sources.push(source);
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn sources(&self) -> &[Box<dyn TokenSource>] {
		&self.sources
	}
}

impl std::fmt::Debug for ReferenceGroup {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let ids: Vec<&str> = self.sources.iter().map(|s| s.id()).collect();
		f.debug_struct("ReferenceGroup").field("label", &self.label).field("sources", &ids).finish()
	}
}
