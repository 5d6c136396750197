use std::collections::HashMap;

use rand::Rng;

use super::context::{Context, SENTINEL};

/// Order-2 word-level Markov chain.
///
/// The `TransitionTable` maps every two-word `Context` seen in the corpus to
/// the list of words observed right after it.
///
/// # Responsibilities
/// - Build the chain from messages, one independent walk per message
/// - Pick a random follower of a context, weighted by its occurrences
///
/// # Invariants
/// - Every follower list is non-empty
/// - Followers are kept in insertion order, repeats included
/// - Every message contributes a `(SENTINEL, SENTINEL)` transition and a
///   final transition toward `SENTINEL`
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
	/// Mapping from a context to the words that followed it.
	/// Example: { ("\n", "the") => ["cat", "dog", "cat"] }
	transitions: HashMap<Context, Vec<String>>,

	/// Number of messages fed to the table.
	messages: usize,
}

impl TransitionTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from a sequence of messages.
	///
	/// An empty sequence yields an empty table.
	pub fn build<I, S>(messages: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut table = Self::new();
		table.extend(messages);
		table
	}

	/// Adds every message of `messages` to the table.
	pub fn extend<I, S>(&mut self, messages: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for message in messages {
			self.add_message(message.as_ref());
		}
	}

	/// Adds a single message to the table.
	///
	/// The context is reset to `(SENTINEL, SENTINEL)` before the first word
	/// and the final context is marked with a transition toward `SENTINEL`.
	/// An empty message contributes only `(SENTINEL, SENTINEL) -> SENTINEL`.
	pub fn add_message(&mut self, message: &str) {
		let mut context = Context::start();
		for word in message.split_whitespace() {
			self.push(&context, word);
			context.advance(word);
		}
		// Mark the end of the message
		self.push(&context, SENTINEL);
		self.messages += 1;
	}

	fn push(&mut self, context: &Context, word: &str) {
		match self.transitions.get_mut(context) {
			Some(followers) => followers.push(word.to_owned()),
			None => {
				self.transitions.insert(context.clone(), vec![word.to_owned()]);
			}
		}
	}

	/// Returns the words observed after `context`, in insertion order.
	pub fn followers(&self, context: &Context) -> Option<&[String]> {
		self.transitions.get(context).map(Vec::as_slice)
	}

	/// Picks a follower of `context` uniformly at random, with replacement.
	///
	/// Since followers are stored with repetition, a word seen twice as often
	/// after `context` is twice as likely to be chosen.
	///
	/// Returns `None` if the context is unknown.
	pub fn next_word<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Option<&str> {
		let followers = self.transitions.get(context)?;
		if followers.is_empty() {
			// Should not happen due to invariants
			return None;
		}
		Some(followers[rng.random_range(0..followers.len())].as_str())
	}

	/// Iterates over the known contexts.
	pub fn contexts(&self) -> impl Iterator<Item = &Context> {
		self.transitions.keys()
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Number of messages the table was built from.
	pub fn message_count(&self) -> usize {
		self.messages
	}
}
