use std::sync::{Mutex, MutexGuard, TryLockError};

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::{Deserialize, Serialize};
use tweetdreams_core::config::load_toml;
use tweetdreams_core::ingest::{FolderIngestor, HttpIngestor, Ingestor};
use tweetdreams_core::{Credentials, Dream, DreamConfig, DreamError};

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "TWEETDREAMS_CONFIG";

/// Configuration file used when `TWEETDREAMS_CONFIG` is not set.
const DEFAULT_CONFIG: &str = "./tweetdreams.toml";

/// Server configuration, read from TOML.
///
/// ```toml
/// host = "127.0.0.1"
/// port = 5000
/// data = "./data"
/// # api_url = "https://api.example.com/1"
/// username = "alice"
/// password = "secret"
/// cors = false
///
/// [dream]
/// max_words = 70
/// max_length = 140
/// ```
#[derive(Deserialize, Debug)]
#[serde(default)]
struct ServerConfig {
	host: String,
	port: u16,
	/// Folder of `.dat` timelines, used when `api_url` is not set.
	data: String,
	/// Base URL of a remote timeline API.
	api_url: Option<String>,
	username: Option<String>,
	password: Option<String>,
	cors: bool,
	dream: DreamConfig,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_owned(),
			port: 5000,
			data: "./data".to_owned(),
			api_url: None,
			username: None,
			password: None,
			cors: false,
			dream: DreamConfig::default(),
		}
	}
}

type SharedDream = Mutex<Dream<Box<dyn Ingestor + Send>>>;

impl ServerConfig {
	fn credentials(&self) -> Credentials {
		Credentials { username: self.username.clone(), password: self.password.clone() }
	}

	/// Opens the dream session described by this configuration.
	///
	/// Must run outside the async runtime: the HTTP ingestor owns a blocking client.
	fn open_dream(&self) -> Result<Dream<Box<dyn Ingestor + Send>>, DreamError> {
		let credentials = self.credentials();
		let (username, password) = credentials.pair().ok_or(DreamError::InvalidCredentials)?;

		let ingestor: Box<dyn Ingestor + Send> = match &self.api_url {
			Some(url) => {
				log::info!("dreaming from {} as {}", url, username);
				Box::new(HttpIngestor::new(url, username, password)?)
			}
			None => {
				log::info!("dreaming from folder {} as {}", self.data, username);
				Box::new(FolderIngestor::new(&self.data)?)
			}
		};
		Dream::new(&credentials, ingestor, self.dream.clone())
	}
}

/// Query parameters for the `/v1/dream` endpoint.
#[derive(Deserialize)]
struct DreamParams {
	max_words: Option<usize>,
}

/// Body of the `/v1/corpus` endpoint.
#[derive(Serialize)]
struct CorpusStatus {
	messages: usize,
	contexts: usize,
	built: bool,
}

/// HTTP GET endpoint `/v1/dream`
///
/// Generates a dream, fetching the corpus on first call.
/// Returns `404` while there is nothing to dream about.
#[get("/v1/dream")]
async fn get_dream(data: web::Data<SharedDream>, query: web::Query<DreamParams>) -> impl Responder {
	let max_words = query.max_words;

	// Ingestion may block on network I/O
	let result = web::block(move || match data.lock() {
		Ok(mut dream) => Some(dream.dream(max_words)),
		Err(_) => None,
	})
	.await;

	match result {
		Ok(Some(Ok(dream))) => HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(dream),
		Ok(Some(Err(DreamError::EmptyModel))) => HttpResponse::NotFound().body(DreamError::EmptyModel.to_string()),
		Ok(Some(Err(e))) => HttpResponse::InternalServerError().body(e.to_string()),
		Ok(None) => HttpResponse::InternalServerError().body("Dream lock failed"),
		Err(_) => HttpResponse::InternalServerError().body("Dream task failed"),
	}
}

#[get("/v1/friends")]
async fn get_friends(data: web::Data<SharedDream>) -> impl Responder {
	let result = web::block(move || {
		let dream = data.lock().map_err(|_| "Dream lock failed".to_owned())?;
		dream.friends().map_err(|e| e.to_string())
	})
	.await;

	match result {
		Ok(Ok(friends)) => HttpResponse::Ok().body(friends.join("\n")),
		Ok(Err(e)) => HttpResponse::BadGateway().body(e),
		Err(_) => HttpResponse::InternalServerError().body("Friends task failed"),
	}
}

/// Locks the session without waiting.
///
/// A dream may hold the lock for the whole ingestion, which must not stall
/// an actix worker: a busy session answers `503` instead.
fn try_lock(data: &SharedDream) -> Result<MutexGuard<'_, Dream<Box<dyn Ingestor + Send>>>, HttpResponse> {
	data.try_lock().map_err(|e| match e {
		TryLockError::WouldBlock => HttpResponse::ServiceUnavailable().body("Dream session busy"),
		TryLockError::Poisoned(_) => HttpResponse::InternalServerError().body("Dream lock failed"),
	})
}

#[get("/v1/corpus")]
async fn get_corpus(data: web::Data<SharedDream>) -> impl Responder {
	let dream = match try_lock(&data) {
		Ok(m) => m,
		Err(response) => return response,
	};
	HttpResponse::Ok().json(CorpusStatus {
		messages: dream.messages().len(),
		contexts: dream.table().map_or(0, |table| table.len()),
		built: dream.table().is_some(),
	})
}

#[put("/v1/reset")]
async fn put_reset(data: web::Data<SharedDream>) -> impl Responder {
	let mut dream = match try_lock(&data) {
		Ok(m) => m,
		Err(response) => return response,
	};
	dream.reset();
	log::info!("dream session reset");
	HttpResponse::Ok().body("Dream session reset")
}

async fn serve(config: &ServerConfig, shared_dream: web::Data<SharedDream>) -> std::io::Result<()> {
	let cors = config.cors;
	log::info!("listening on {}:{}", config.host, config.port);

	HttpServer::new(move || {
		let cors = if cors { Cors::permissive() } else { Cors::default() };
		App::new()
			.wrap(cors)
			.app_data(shared_dream.clone())
			.service(get_dream)
			.service(get_friends)
			.service(get_corpus)
			.service(put_reset)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

/// Main entry point for the server.
///
/// Loads the configuration, opens the dream session before starting the
/// runtime, then serves it behind a `Mutex`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_owned());
	let config: ServerConfig = load_toml(&path)?;
	let shared_dream = web::Data::new(Mutex::new(config.open_dream()?));

	actix_web::rt::System::new().block_on(serve(&config, shared_dream.clone()))?;
	Ok(())
}
