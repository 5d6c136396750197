//! Top-level module for the dream generation system.
//!
//! This module provides an order-2 word-level Markov chain, including:
//! - Two-word chain states (`Context`) and the boundary `SENTINEL`
//! - The chain itself (`TransitionTable`)
//! - Generation limits (`DreamInput`)
//! - The random walk producing dreams (`Generator`)
//! - A lazily built, per-account session (`Dream`)

/// Two-word chain state and message boundary token.
pub mod context;

/// Mapping from contexts to observed followers (the chain builder).
pub mod transition_table;

/// Word and character caps of a single dream.
pub mod dream_input;

/// Random walk over a transition table.
///
/// Randomness is always injected, so a seeded or stubbed source gives
/// reproducible dreams.
pub mod generator;

/// Per-account session owning the corpus and its transition table.
pub mod dream;

#[cfg(test)]
pub(crate) mod testing;
