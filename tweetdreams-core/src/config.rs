use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, DreamError};

/// By default, dreams cannot be longer than this number of characters.
pub const MAX_LENGTH: usize = 140;

/// Default upper bound on the number of words walked per dream.
pub const MAX_WORDS: usize = 70;

/// Default number of recent messages fetched per friend.
pub const TIMELINE_COUNT: usize = 200;

/// Generation and ingestion limits of a dream session.
///
/// Every field is optional in TOML and falls back to its default:
///
/// ```toml
/// max_words = 70
/// max_length = 140
/// timeline_count = 200
/// ```
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DreamConfig {
	/// Maximum number of words in a dream, before truncation.
	pub max_words: usize,

	/// Maximum number of characters in a dream.
	pub max_length: usize,

	/// Number of recent messages requested for each friend.
	pub timeline_count: usize,
}

impl Default for DreamConfig {
	fn default() -> Self {
		Self { max_words: MAX_WORDS, max_length: MAX_LENGTH, timeline_count: TIMELINE_COUNT }
	}
}

impl DreamConfig {
	/// Loads a `DreamConfig` from a TOML file.
	///
	/// A missing file yields the default configuration.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DreamError> {
		Ok(load_toml(path)?)
	}
}

/// Account credentials identifying whose friends feed the dreams.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Credentials {
	pub username: Option<String>,
	pub password: Option<String>,
}

impl Credentials {
	pub fn new(username: &str, password: &str) -> Self {
		Self { username: Some(username.to_owned()), password: Some(password.to_owned()) }
	}

	/// Returns `(username, password)` if both are present and non-blank.
	pub fn pair(&self) -> Option<(&str, &str)> {
		let username = self.username.as_deref().filter(|s| !s.trim().is_empty())?;
		let password = self.password.as_deref().filter(|s| !s.trim().is_empty())?;
		Some((username, password))
	}
}

/// Reads and parses a TOML file into `T`.
///
/// Returns `T::default()` when the file does not exist.
pub fn load_toml<T, P>(path: P) -> Result<T, ConfigError>
where
	T: DeserializeOwned + Default,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	if !path.exists() {
		log::debug!("config file {} not found, using defaults", path.display());
		return Ok(T::default());
	}
	let contents = std::fs::read_to_string(path)?;
	Ok(toml::from_str(&contents)?)
}
