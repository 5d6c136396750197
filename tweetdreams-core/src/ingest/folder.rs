use std::path::{Path, PathBuf};

use super::Ingestor;
use crate::error::IngestError;
use crate::io;

/// Extension of the timeline files.
const TIMELINE_EXTENSION: &str = "dat";

/// Reads timelines from a folder.
///
/// Each `<screen_name>.dat` file directly inside the folder is one friend;
/// each non-blank line of the file is one message, most recent first.
#[derive(Clone, Debug)]
pub struct FolderIngestor {
	folder: PathBuf,
}

impl FolderIngestor {
	/// Creates an ingestor over `folder`.
	///
	/// Both `"folder"` and `"folder/"` are accepted; `"."` is the current
	/// working directory.
	///
	/// # Errors
	/// Returns an error if the path is not a directory.
	pub fn new<P: AsRef<Path>>(folder: P) -> Result<Self, IngestError> {
		let folder = folder.as_ref();
		// "." and "./" have the same single component
		let folder = if folder == Path::new(".") {
			std::env::current_dir()?
		} else {
			folder.to_path_buf()
		};

		if !folder.is_dir() {
			return Err(IngestError::InvalidPath(format!("expected a directory, got: {}", folder.display())));
		}

		Ok(Self { folder })
	}

	fn timeline_path(&self, friend: &str) -> PathBuf {
		self.folder.join(format!("{friend}.{TIMELINE_EXTENSION}"))
	}
}

impl Ingestor for FolderIngestor {
	fn friends(&self) -> Result<Vec<String>, IngestError> {
		Ok(io::list_stems(&self.folder, TIMELINE_EXTENSION)?)
	}

	fn timeline(&self, friend: &str, count: usize) -> Result<Vec<String>, IngestError> {
		let mut messages = io::read_messages(self.timeline_path(friend))?;
		messages.truncate(count);
		Ok(messages)
	}
}
