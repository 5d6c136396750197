//! Deterministic random sources for tests.

use rand::RngCore;

/// A random source whose every draw is zero.
///
/// `random_range(0..n)` always yields `0`, so the first follower of a
/// context is always picked.
pub(crate) struct FirstChoice;

impl RngCore for FirstChoice {
	fn next_u32(&mut self) -> u32 {
		0
	}

	fn next_u64(&mut self) -> u64 {
		0
	}

	fn fill_bytes(&mut self, dst: &mut [u8]) {
		dst.fill(0);
	}
}
