use super::Ingestor;
use crate::error::IngestError;

/// An in-memory corpus: friends and their messages, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryIngestor {
	timelines: Vec<(String, Vec<String>)>,
}

impl MemoryIngestor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a friend and its messages, most recent first.
	pub fn with_friend<I, S>(mut self, friend: &str, messages: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.timelines.push((friend.to_owned(), messages.into_iter().map(Into::into).collect()));
		self
	}
}

impl Ingestor for MemoryIngestor {
	fn friends(&self) -> Result<Vec<String>, IngestError> {
		Ok(self.timelines.iter().map(|(friend, _)| friend.clone()).collect())
	}

	fn timeline(&self, friend: &str, count: usize) -> Result<Vec<String>, IngestError> {
		Ok(self
			.timelines
			.iter()
			.find(|(name, _)| name == friend)
			.map(|(_, messages)| messages.iter().take(count).cloned().collect())
			.unwrap_or_default())
	}
}
