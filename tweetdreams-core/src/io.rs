use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::{fs, io};

/// Reads a text file and returns its non-blank lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Lines containing only whitespace are dropped
pub(crate) fn read_messages<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.filter(|line| !line.trim().is_empty())
		.map(str::to_owned)
		.collect())
}

/// Lists the files of a directory having a given extension.
///
/// Returns file stems only (`alice.dat` → `alice`), sorted so that friends
/// are always visited in the same order.
pub(crate) fn list_stems<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut stems = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(stem) = path.file_stem() {
				stems.push(stem.to_string_lossy().into_owned());
			}
		}
	}

	stems.sort();
	Ok(stems)
}
