use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{env, fs, io};

use regex::Regex;

/// ASCII punctuation, as stripped from every word before n-gram extraction.
fn punctuation() -> &'static Regex {
	static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
	// Should not panic, the pattern is a constant
	PUNCTUATION.get_or_init(|| Regex::new(r"[[:punct:]]").expect("valid punctuation pattern"))
}

/// Splits `text` into cleaned words.
///
/// - Splits on whitespace
/// - Removes ASCII punctuation
/// - Lowercases
/// - Drops words left empty (ex. a lone `-`)
pub fn tokenize(text: &str) -> Vec<String> {
	text.split_whitespace()
		.map(|word| punctuation().replace_all(word, "").to_lowercase())
		.filter(|word| !word.is_empty())
		.collect()
}

/// Decodes file contents as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to a character, so decoding never fails and
/// accented letters of legacy corpora survive.
pub(crate) fn decode(bytes: Vec<u8>) -> String {
	match String::from_utf8(bytes) {
		Ok(text) => text,
		Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
	}
}

/// Reads a text file and returns its cleaned words.
///
/// Only I/O failures are errors; contents that are not UTF-8 are decoded as Latin-1.
pub(crate) fn read_tokens<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let contents = decode(fs::read(filename)?);
	Ok(tokenize(&contents))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all regular files with a given extension in a directory.
///
/// Returns full paths, sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Lists the sub-directories of a directory as `(name, path)` pairs, sorted by name.
///
/// Entries whose name is not valid UTF-8 are skipped.
pub(crate) fn list_dirs<P: AsRef<Path>>(dir: P) -> io::Result<Vec<(String, PathBuf)>> {
	let mut dirs = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_dir() {
			continue;
		}
		if let Some(name) = path.file_name().and_then(OsStr::to_str) {
			dirs.push((name.to_owned(), path.clone()));
		}
	}

	dirs.sort();
	Ok(dirs)
}
