use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use langid_core::{Classification, Classifier, ClassifierConfig, DataFolder, LangIdResult};
use log::warn;

/// Identify the language of `mystery.txt` from the `lang-xx/` corpora next to it.
#[derive(Parser, Debug)]
#[command(name = "langid", version)]
struct Cli {
	/// Value of n for the n-gram model
	#[arg(value_parser = clap::value_parser!(u64).range(1..))]
	n: u64,

	/// Folder containing mystery.txt and the lang-xx language folders
	local_folder: PathBuf,

	/// Maximum number of worker threads (0 = one per CPU)
	#[arg(long, env = "LANGID_WORKERS", default_value_t = 0)]
	workers: usize,

	/// Name of the unlabeled sample inside the folder
	#[arg(long, default_value = langid_core::config::DEFAULT_MYSTERY_FILE)]
	mystery: String,

	/// Extension of the reference corpus files
	#[arg(long, default_value = langid_core::config::DEFAULT_TEXT_EXTENSION)]
	extension: String,

	/// Print the similarity of every language, best first
	#[arg(long)]
	scores: bool,
}

impl Cli {
	fn config(&self) -> LangIdResult<ClassifierConfig> {
		let mut config = ClassifierConfig::new(self.n as usize)?;
		config.workers = self.workers;
		config.set_mystery_file(&self.mystery)?;
		config.set_text_extension(&self.extension)?;
		Ok(config)
	}
}

fn run(cli: &Cli) -> LangIdResult<Classification> {
	let config = cli.config()?;
	let folder = DataFolder::open(&cli.local_folder, &config)?;
	let groups = folder.reference_groups()?;
	Classifier::from_config(config).classify(&folder.mystery(), &groups)
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let cli = Cli::parse();

	match run(&cli) {
		Ok(classification) => {
			for source in classification.skipped_sources() {
				warn!("Skipped unreadable file: {}", source);
			}
			if cli.scores {
				for score in classification.ranking() {
					println!("{}\t{:.6}", score.label, score.similarity);
				}
			}
			println!("Best matched language of {}: {}", cli.mystery, classification.language());
			ExitCode::SUCCESS
		}
		Err(e) => {
			eprintln!("ERROR: {e}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_positional_arguments() {
		let cli = Cli::try_parse_from(["langid", "3", "data"]).unwrap();
		assert_eq!(cli.n, 3);
		assert_eq!(cli.local_folder, PathBuf::from("data"));
		assert!(!cli.scores);
		assert_eq!(cli.config().unwrap().order(), 3);
	}

	#[test]
	fn rejects_zero_order() {
		assert!(Cli::try_parse_from(["langid", "0", "data"]).is_err());
	}

	#[test]
	fn requires_both_arguments() {
		assert!(Cli::try_parse_from(["langid", "3"]).is_err());
	}

	#[test]
	fn layout_flags_reach_config() {
		let cli = Cli::try_parse_from(["langid", "2", "data", "--mystery", "sample.txt", "--extension", ".md", "--workers", "2"])
			.unwrap();
		let config = cli.config().unwrap();
		assert_eq!(config.mystery_file(), "sample.txt");
		assert_eq!(config.text_extension(), "md");
		assert_eq!(config.workers, 2);
	}
}
