use crate::config::{DreamConfig, MAX_LENGTH, MAX_WORDS};

/// Input parameters for generating a single dream.
///
/// # Invariants
/// - A generated dream never holds more than `max_words` words
/// - A generated dream is never longer than `max_length` characters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DreamInput {
	/// Maximum number of words walked before stopping.
	pub max_words: usize,

	/// Maximum number of characters kept after joining the words.
	pub max_length: usize,
}

impl Default for DreamInput {
	fn default() -> Self {
		Self { max_words: MAX_WORDS, max_length: MAX_LENGTH }
	}
}

impl DreamInput {
	/// Creates an input from a session configuration, optionally overriding
	/// the word cap.
	pub fn from_config(config: &DreamConfig, max_words: Option<usize>) -> Self {
		Self {
			max_words: max_words.unwrap_or(config.max_words),
			max_length: config.max_length,
		}
	}
}
