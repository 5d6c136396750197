//! Corpus sources.
//!
//! A dream session does not care where messages come from: it asks an
//! `Ingestor` for the friends of the account, then for the recent messages
//! of each friend, in that order.

use crate::error::IngestError;

/// Folder of `.dat` files, one file per friend.
pub mod folder;

/// Twitter-like JSON API over HTTP.
pub mod http;

/// In-memory corpus.
pub mod memory;

pub use folder::FolderIngestor;
pub use http::HttpIngestor;
pub use memory::MemoryIngestor;

/// A source of friends and of their messages.
///
/// Messages are fed to the chain in the order they are returned.
pub trait Ingestor {
	/// Returns the screen names of the account's friends.
	fn friends(&self) -> Result<Vec<String>, IngestError>;

	/// Returns up to `count` recent messages of `friend`.
	fn timeline(&self, friend: &str, count: usize) -> Result<Vec<String>, IngestError>;
}

impl<T: Ingestor + ?Sized> Ingestor for Box<T> {
	fn friends(&self) -> Result<Vec<String>, IngestError> {
		(**self).friends()
	}

	fn timeline(&self, friend: &str, count: usize) -> Result<Vec<String>, IngestError> {
		(**self).timeline(friend, count)
	}
}
