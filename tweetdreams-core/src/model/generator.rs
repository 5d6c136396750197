use rand::Rng;

use super::context::{Context, SENTINEL};
use super::dream_input::DreamInput;
use super::transition_table::TransitionTable;
use crate::error::DreamError;

/// Walks a `TransitionTable` to produce dreams.
///
/// # Responsibilities
/// - Check the table can start a walk (it knows the start context)
/// - Pick followers at random until a terminal word or the word cap
/// - Join and truncate the result to the character cap
#[derive(Debug)]
pub struct Generator<'a> {
	table: &'a TransitionTable,
}

impl<'a> Generator<'a> {
	/// Creates a generator over `table`.
	///
	/// # Errors
	/// Returns `DreamError::EmptyModel` if the table has no entry for the
	/// start context, i.e. it was built from no message at all.
	pub fn new(table: &'a TransitionTable) -> Result<Self, DreamError> {
		if table.followers(&Context::start()).is_none() {
			return Err(DreamError::EmptyModel);
		}
		Ok(Self { table })
	}

	/// Generates a dream.
	///
	/// # Behavior
	/// - Starts from `(SENTINEL, SENTINEL)`.
	/// - Draws up to `input.max_words` followers uniformly with replacement.
	/// - Stops on `SENTINEL` or on a word ending with `.`; that word is
	///   dropped, not kept.
	/// - Joins the words with single spaces and keeps at most
	///   `input.max_length` characters, possibly cutting a word.
	pub fn dream<R: Rng + ?Sized>(&self, input: &DreamInput, rng: &mut R) -> String {
		let mut context = Context::start();
		let mut words: Vec<&str> = Vec::new();

		for _ in 0..input.max_words {
			let word = match self.table.next_word(&context, rng) {
				Some(word) => word,
				None => break,
			};
			if word == SENTINEL || word.ends_with('.') {
				break;
			}
			words.push(word);
			context.advance(word);
		}

		let mut result = words.join(" ");
		truncate_chars(&mut result, input.max_length);
		result
	}
}

/// Generates a dream from `table` with the given limits and random source.
///
/// # Errors
/// Returns `DreamError::EmptyModel` if the table cannot start a walk.
pub fn generate<R: Rng + ?Sized>(table: &TransitionTable, input: &DreamInput, rng: &mut R) -> Result<String, DreamError> {
	Ok(Generator::new(table)?.dream(input, rng))
}

/// Keeps at most the first `n` characters of `s`.
///
/// UTF-8 safe: counts characters, not bytes.
fn truncate_chars(s: &mut String, n: usize) {
	if let Some((index, _)) = s.char_indices().nth(n) {
		s.truncate(index);
	}
}
