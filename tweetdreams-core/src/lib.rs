//! Markov-chain "dream" generation from short text messages.
//!
//! This crate provides a small order-2 word-level Markov chain and the
//! plumbing around it:
//! - A transition table mapping two-word contexts to observed followers
//! - A generator walking the table with an injectable random source
//! - A `Dream` session lazily ingesting the timelines of an account's friends
//! - Pluggable corpus sources (in-memory, folder of files, HTTP API)
//!
//! The model itself is never persisted: each session builds its own table
//! the first time a dream is requested.

/// Markov chain, generator and dream session.
pub mod model;

/// Corpus sources feeding the dream session.
pub mod ingest;

/// Generation and ingestion limits, loadable from TOML.
pub mod config;

/// Error types shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use config::{Credentials, DreamConfig};
pub use error::{ConfigError, DreamError, IngestError};
pub use model::dream::Dream;
