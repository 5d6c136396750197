/// Boundary token marking the start and the end of every message.
///
/// Messages are split on whitespace, so this can never be a word.
pub const SENTINEL: &str = "\n";

/// The state of the Markov chain: the two most recent words.
///
/// Equality is order-sensitive: `(a, b)` and `(b, a)` are different contexts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Context {
	first: String,
	second: String,
}

impl Context {
	/// Creates a context from two words.
	pub fn new(first: &str, second: &str) -> Self {
		Self { first: first.to_owned(), second: second.to_owned() }
	}

	/// The context every message starts from: `(SENTINEL, SENTINEL)`.
	pub fn start() -> Self {
		Self::new(SENTINEL, SENTINEL)
	}

	/// Shifts the context by one word: `(w1, w2)` becomes `(w2, word)`.
	pub fn advance(&mut self, word: &str) {
		self.first = std::mem::replace(&mut self.second, word.to_owned());
	}

	pub fn first(&self) -> &str {
		&self.first
	}

	pub fn second(&self) -> &str {
		&self.second
	}
}
