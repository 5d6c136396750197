use rand::Rng;

use super::dream_input::DreamInput;
use super::generator::generate;
use super::transition_table::TransitionTable;
use crate::config::{Credentials, DreamConfig};
use crate::error::{DreamError, IngestError};
use crate::ingest::{HttpIngestor, Ingestor};

/// A dream session: the messages of an account's friends and the Markov
/// chain built from them.
///
/// # Responsibilities
/// - Check the account credentials at creation
/// - Fetch the friends' messages on first use, skipping failing friends
/// - Build the transition table once, lazily
/// - Generate dreams within the configured limits
///
/// # Invariants
/// - A table built from at least one message is never rebuilt until `reset` is called
/// - A table built from no message is discarded by the next dream
pub struct Dream<I: Ingestor> {
	username: String,
	ingestor: I,
	config: DreamConfig,
	messages: Vec<String>,
	table: Option<TransitionTable>,
}

impl Dream<HttpIngestor> {
	/// Creates a session fetching its corpus from an HTTP API, authenticated
	/// with the session credentials.
	///
	/// # Errors
	/// - `DreamError::InvalidCredentials` if the username or password is missing.
	/// - `DreamError::Ingest` if the HTTP client cannot be created.
	pub fn connect(credentials: &Credentials, api_url: &str, config: DreamConfig) -> Result<Self, DreamError> {
		let (username, password) = credentials.pair().ok_or(DreamError::InvalidCredentials)?;
		let ingestor = HttpIngestor::new(api_url, username, password)?;
		Self::new(credentials, ingestor, config)
	}
}

impl<I: Ingestor> Dream<I> {
	/// Creates a new session over `ingestor`.
	///
	/// Nothing is fetched yet: the corpus is retrieved by the first dream.
	///
	/// # Errors
	/// Returns `DreamError::InvalidCredentials` if the username or password
	/// is missing or blank.
	pub fn new(credentials: &Credentials, ingestor: I, config: DreamConfig) -> Result<Self, DreamError> {
		let (username, _) = credentials.pair().ok_or(DreamError::InvalidCredentials)?;
		Ok(Self {
			username: username.to_owned(),
			ingestor,
			config,
			messages: Vec::new(),
			table: None,
		})
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn config(&self) -> &DreamConfig {
		&self.config
	}

	/// Messages accumulated so far, in ingestion order.
	pub fn messages(&self) -> &[String] {
		&self.messages
	}

	/// The transition table, if it has been built.
	pub fn table(&self) -> Option<&TransitionTable> {
		self.table.as_ref()
	}

	/// Returns the friends of the account.
	pub fn friends(&self) -> Result<Vec<String>, IngestError> {
		self.ingestor.friends()
	}

	/// Fetches the recent messages of each friend and appends them to the corpus.
	///
	/// A friend whose timeline cannot be fetched is logged and skipped; there
	/// are no retries.
	///
	/// Returns the number of messages added.
	pub fn fetch_messages(&mut self, friends: &[String]) -> usize {
		let before = self.messages.len();
		for friend in friends {
			match self.ingestor.timeline(friend, self.config.timeline_count) {
				Ok(timeline) => {
					log::debug!("fetched {} messages from {}", timeline.len(), friend);
					self.messages.extend(timeline);
				}
				Err(e) => log::warn!("skipping {}: {}", friend, e),
			}
		}
		self.messages.len() - before
	}

	/// Appends messages to the corpus.
	///
	/// Has no effect on a table already built from messages until `reset` is called.
	pub fn add_messages<T, S>(&mut self, messages: T)
	where
		T: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.messages.extend(messages.into_iter().map(Into::into));
	}

	/// Fetches every friend's messages; a failing friend listing leaves the
	/// corpus empty.
	fn ingest(&mut self) {
		let friends = match self.ingestor.friends() {
			Ok(friends) => friends,
			Err(e) => {
				log::warn!("cannot list friends of {}: {}", self.username, e);
				return;
			}
		};
		let added = self.fetch_messages(&friends);
		log::info!("ingested {} messages from {} friends of {}", added, friends.len(), self.username);
	}

	/// Builds the transition table from the corpus, unless already built.
	pub fn build(&mut self) -> &TransitionTable {
		let messages = &self.messages;
		self.table.get_or_insert_with(|| {
			let table = TransitionTable::build(messages);
			log::debug!("built {} contexts from {} messages", table.len(), table.message_count());
			table
		})
	}

	/// Forgets the corpus and the table; the next dream fetches everything again.
	pub fn reset(&mut self) {
		self.messages.clear();
		self.table = None;
	}

	/// Generates a dream of at most `max_words` words (the configured cap
	/// when `None`) and at most `config.max_length` characters.
	///
	/// # Errors
	/// Returns `DreamError::EmptyModel` when there are no messages to dream about.
	pub fn dream(&mut self, max_words: Option<usize>) -> Result<String, DreamError> {
		self.dream_with(max_words, &mut rand::rng())
	}

	/// Same as `dream`, drawing from `rng`.
	pub fn dream_with<R: Rng + ?Sized>(&mut self, max_words: Option<usize>, rng: &mut R) -> Result<String, DreamError> {
		// A table built from no message is not a model yet
		if self.table.as_ref().is_some_and(TransitionTable::is_empty) {
			self.table = None;
		}
		// First time run, or every earlier ingestion came back empty
		if self.table.is_none() && self.messages.is_empty() {
			self.ingest();
		}
		let input = DreamInput::from_config(&self.config, max_words);
		generate(self.build(), &input, rng)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ingest::MemoryIngestor;
	use crate::model::context::{Context, SENTINEL};
	use crate::model::testing::FirstChoice;
	use std::cell::Cell;

	/// Counts calls, fails the first `failing_listings` friend listings and
	/// fails for friends named `broken*`.
	struct FlakyIngestor {
		inner: MemoryIngestor,
		friend_calls: Cell<usize>,
		failing_listings: Cell<usize>,
	}

	impl FlakyIngestor {
		fn new(inner: MemoryIngestor) -> Self {
			Self { inner, friend_calls: Cell::new(0), failing_listings: Cell::new(0) }
		}
	}

	impl Ingestor for FlakyIngestor {
		fn friends(&self) -> Result<Vec<String>, IngestError> {
			self.friend_calls.set(self.friend_calls.get() + 1);
			if self.failing_listings.get() > 0 {
				self.failing_listings.set(self.failing_listings.get() - 1);
				return Err(IngestError::InvalidPath("unreachable".into()));
			}
			self.inner.friends()
		}

		fn timeline(&self, friend: &str, count: usize) -> Result<Vec<String>, IngestError> {
			if friend.starts_with("broken") {
				return Err(IngestError::Io(std::io::Error::other("connection reset")));
			}
			self.inner.timeline(friend, count)
		}
	}

	fn credentials() -> Credentials {
		Credentials::new("alice", "secret")
	}

	#[test]
	fn test_missing_credentials() {
		let missing = [
			Credentials::default(),
			Credentials { username: Some("alice".into()), password: None },
			Credentials { username: None, password: Some("secret".into()) },
			Credentials::new("", "secret"),
		];
		for credentials in missing {
			let result = Dream::new(&credentials, MemoryIngestor::new(), DreamConfig::default());
			assert!(matches!(result, Err(DreamError::InvalidCredentials)));
		}
	}

	#[test]
	fn test_connect_checks_credentials_first() {
		let result = Dream::connect(&Credentials::default(), "http://127.0.0.1:1", DreamConfig::default());
		assert!(matches!(result, Err(DreamError::InvalidCredentials)));
	}

	#[test]
	fn test_dream_ingests_lazily() {
		let ingestor = MemoryIngestor::new()
			.with_friend("bob", ["a b c"])
			.with_friend("carol", ["a b d"]);
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();
		assert!(dream.messages().is_empty());
		assert!(dream.table().is_none());

		assert_eq!(dream.dream_with(None, &mut FirstChoice).unwrap(), "a b c");
		assert_eq!(dream.messages(), ["a b c", "a b d"]);
		let table = dream.table().unwrap();
		assert_eq!(table.followers(&Context::new("a", "b")).unwrap(), ["c", "d"]);
	}

	#[test]
	fn test_empty_corpus_is_empty_model() {
		let mut dream = Dream::new(&credentials(), MemoryIngestor::new(), DreamConfig::default()).unwrap();
		assert!(matches!(dream.dream(None), Err(DreamError::EmptyModel)));
	}

	#[test]
	fn test_failing_friend_listing_degrades_to_empty_model() {
		let ingestor = FlakyIngestor::new(MemoryIngestor::new().with_friend("bob", ["a b"]));
		ingestor.failing_listings.set(usize::MAX);
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();
		assert!(matches!(dream.dream(None), Err(DreamError::EmptyModel)));
	}

	#[test]
	fn test_empty_ingestion_is_retried() {
		let ingestor = FlakyIngestor::new(MemoryIngestor::new().with_friend("bob", ["a b c"]));
		ingestor.failing_listings.set(1);
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();

		assert!(matches!(dream.dream_with(None, &mut FirstChoice), Err(DreamError::EmptyModel)));
		assert_eq!(dream.dream_with(None, &mut FirstChoice).unwrap(), "a b c");
		assert_eq!(dream.ingestor.friend_calls.get(), 2);
		assert_eq!(dream.table().unwrap().message_count(), 1);

		// Once built from real messages, the table is kept
		dream.dream_with(None, &mut FirstChoice).unwrap();
		assert_eq!(dream.ingestor.friend_calls.get(), 2);
	}

	#[test]
	fn test_messages_added_after_empty_dream_are_used() {
		let mut dream = Dream::new(&credentials(), MemoryIngestor::new(), DreamConfig::default()).unwrap();
		assert!(matches!(dream.dream_with(None, &mut FirstChoice), Err(DreamError::EmptyModel)));

		dream.add_messages(["hello there"]);
		assert_eq!(dream.dream_with(None, &mut FirstChoice).unwrap(), "hello there");
	}

	#[test]
	fn test_failing_friend_is_skipped() {
		let ingestor = FlakyIngestor::new(
			MemoryIngestor::new()
				.with_friend("bob", ["first message"])
				.with_friend("broken_link", ["never seen"])
				.with_friend("carol", ["second message"]),
		);
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();

		dream.dream_with(None, &mut FirstChoice).unwrap();
		assert_eq!(dream.messages(), ["first message", "second message"]);
	}

	#[test]
	fn test_fetch_messages_respects_timeline_count() {
		let ingestor = MemoryIngestor::new().with_friend("bob", ["one", "two", "three"]);
		let config = DreamConfig { timeline_count: 2, ..DreamConfig::default() };
		let mut dream = Dream::new(&credentials(), ingestor, config).unwrap();

		let friends = dream.friends().unwrap();
		assert_eq!(dream.fetch_messages(&friends), 2);
		assert_eq!(dream.messages(), ["one", "two"]);
	}

	#[test]
	fn test_build_once_per_session() {
		let ingestor = FlakyIngestor::new(MemoryIngestor::new().with_friend("bob", ["a b c"]));
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();

		dream.dream_with(None, &mut FirstChoice).unwrap();
		dream.dream_with(None, &mut FirstChoice).unwrap();
		dream.build();
		assert_eq!(dream.ingestor.friend_calls.get(), 1);

		let table = dream.table().unwrap();
		assert_eq!(table.followers(&Context::start()).unwrap(), ["a"]);
		assert_eq!(table.message_count(), 1);

		// New messages only count after a reset
		dream.add_messages(["x y"]);
		dream.build();
		assert_eq!(dream.table().unwrap().message_count(), 1);
	}

	#[test]
	fn test_reset_ingests_again() {
		let ingestor = FlakyIngestor::new(MemoryIngestor::new().with_friend("bob", ["a b c"]));
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();

		dream.dream_with(None, &mut FirstChoice).unwrap();
		dream.reset();
		assert!(dream.table().is_none());
		assert!(dream.messages().is_empty());

		dream.dream_with(None, &mut FirstChoice).unwrap();
		assert_eq!(dream.ingestor.friend_calls.get(), 2);
		assert_eq!(dream.table().unwrap().message_count(), 1);
	}

	#[test]
	fn test_seeded_messages_skip_ingestion() {
		let ingestor = FlakyIngestor::new(MemoryIngestor::new().with_friend("bob", ["never fetched"]));
		let mut dream = Dream::new(&credentials(), ingestor, DreamConfig::default()).unwrap();
		dream.add_messages(["hello world."]);

		assert_eq!(dream.dream_with(None, &mut FirstChoice).unwrap(), "hello");
		assert_eq!(dream.ingestor.friend_calls.get(), 0);
	}

	#[test]
	fn test_limits_come_from_config() {
		let config = DreamConfig { max_words: 2, max_length: 5, timeline_count: 200 };
		let mut dream = Dream::new(&credentials(), MemoryIngestor::new(), config).unwrap();
		dream.add_messages(["alpha beta gamma"]);

		assert_eq!(dream.dream_with(None, &mut FirstChoice).unwrap(), "alpha");
		assert_eq!(dream.dream_with(Some(1), &mut FirstChoice).unwrap(), "alpha");
		assert_eq!(dream.dream_with(Some(0), &mut FirstChoice).unwrap(), "");
	}

	#[test]
	fn test_empty_message_dreams_nothing() {
		let mut dream = Dream::new(&credentials(), MemoryIngestor::new(), DreamConfig::default()).unwrap();
		dream.add_messages([""]);

		assert_eq!(dream.dream(None).unwrap(), "");
		assert_eq!(dream.table().unwrap().followers(&Context::start()).unwrap(), [SENTINEL]);
	}
}
