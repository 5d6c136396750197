use thiserror::Error;

/// Errors surfaced by a dream session.
#[derive(Debug, Error)]
pub enum DreamError {
	/// No username or password was supplied when creating the session.
	#[error("you must supply a username and a password")]
	InvalidCredentials,

	/// The transition table has no start context: there is nothing to dream about yet.
	#[error("no messages available to dream about")]
	EmptyModel,

	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	/// The corpus source could not be set up.
	#[error("cannot open corpus source: {0}")]
	Ingest(#[from] IngestError),
}

/// Errors raised by a corpus source.
///
/// Fetch errors never escape `Dream::dream`: failures are logged and the
/// offending batch is skipped.
#[derive(Debug, Error)]
pub enum IngestError {
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	#[error("http error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("invalid path: {0}")]
	InvalidPath(String),
}

/// Errors raised while loading a TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("cannot read config: {0}")]
	Io(#[from] std::io::Error),

	#[error("cannot parse config: {0}")]
	Parse(#[from] toml::de::Error),
}
