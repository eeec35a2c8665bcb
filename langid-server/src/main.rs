use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, post, web};
use clap::Parser;
use langid_core::{Classifier, ClassifierConfig, DataFolder, LangIdError, References, Score, TextSource};
use log::info;
use serde::Serialize;

/// Command line options of the server
#[derive(Parser, Debug)]
#[command(name = "langid-server", version)]
struct Options {
	/// Folder containing the lang-xx language folders
	#[arg(long, env = "LANGID_DATA", default_value = "./data")]
	data: PathBuf,

	/// Value of n for the n-gram model
	#[arg(long, env = "LANGID_ORDER", default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
	order: u64,

	/// Maximum number of worker threads used to build the references (0 = one per CPU)
	#[arg(long, env = "LANGID_WORKERS", default_value_t = 0)]
	workers: usize,

	/// Address to bind
	#[arg(long, env = "LANGID_BIND", default_value = "127.0.0.1:5000")]
	bind: String,
}

/// Reference models built once at start-up, read-only afterwards
struct SharedData {
	classifier: Classifier,
	references: References,
}

#[derive(Serialize)]
struct LanguageInfo {
	label: String,
	distinct_ngrams: usize,
	total_ngrams: u64,
}

#[derive(Serialize)]
struct Identification {
	language: String,
	scores: Vec<Score>,
}

/// HTTP GET endpoint `/v1/languages`
///
/// Lists the loaded reference languages and the size of their profiles.
#[get("/v1/languages")]
async fn get_languages(data: web::Data<SharedData>) -> impl Responder {
	let languages: Vec<LanguageInfo> = data
		.references
		.models()
		.iter()
		.map(|model| LanguageInfo {
			label: model.label().to_owned(),
			distinct_ngrams: model.distinct_ngrams(),
			total_ngrams: model.total_ngrams(),
		})
		.collect();
	HttpResponse::Ok().json(languages)
}

/// HTTP POST endpoint `/v1/identify`
///
/// Identifies the language of the plain-text request body.
/// Returns the best language and every defined score, best first.
/// A blank body, or one without any n-gram, is unprocessable (422).
#[post("/v1/identify")]
async fn post_identify(data: web::Data<SharedData>, body: String) -> impl Responder {
	if body.trim().is_empty() {
		return HttpResponse::UnprocessableEntity().body("Missing or empty text");
	}

	let sample = TextSource::new("request", body);
	let mystery = match data.classifier.build_mystery(&sample) {
		Ok(model) => model,
		Err(e) => return HttpResponse::InternalServerError().body(e.to_string()),
	};

	match data.classifier.rank(&mystery, &data.references) {
		Ok(classification) => HttpResponse::Ok().json(Identification {
			language: classification.language().to_owned(),
			scores: classification.ranking(),
		}),
		Err(e @ LangIdError::NoCandidates) => HttpResponse::UnprocessableEntity().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

fn load(options: &Options) -> Result<SharedData, LangIdError> {
	let mut config = ClassifierConfig::new(options.order as usize)?;
	config.workers = options.workers;

	let folder = DataFolder::open(&options.data, &config)?;
	let groups = folder.reference_groups()?;
	let classifier = Classifier::from_config(config);
	let references = classifier.build_references(&groups)?;
	info!(
		"Loaded {} reference languages from {} ({} files skipped)",
		references.models().len(),
		folder.root().display(),
		references.skipped_sources().len()
	);

	Ok(SharedData { classifier, references })
}

/// Main entry point for the server.
///
/// Builds the reference models once, then serves them read-only from an
/// Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let options = Options::parse();
	let shared_data = load(&options).map_err(std::io::Error::other)?;
	let shared_data = web::Data::new(shared_data);

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_languages)
			.service(post_identify)
	})
		.bind(&options.bind)?
		.run()
		.await
}
