//! Shared registry of confirmed primes.
//!
//! The registry is an append-only ascending-by-round collection guarded by
//! the single core lock it shares with the round barrier. It performs no
//! primality validation of its own: callers append only through the
//! barrier's completion step (`RoundBarrier::complete_round`), after having
//! verified the candidate themselves.

use std::sync::Arc;

use tracing::debug;

use super::types::SieveState;
use crate::core::errors::Result;

/// Handle to the shared prime collection.
#[derive(Debug, Clone)]
pub struct PrimeRegistry {
    state: Arc<SieveState>,
}

impl PrimeRegistry {
    pub fn new(state: Arc<SieveState>) -> Self {
        Self { state }
    }

    /// Current confirmed length under the lock.
    pub fn snapshot_len(&self) -> Result<usize> {
        Ok(self.state.guard()?.primes.len())
    }

    /// Copy of the entries below `limit` within the first `visible_len`
    /// elements (or the full live prefix when `visible_len` is `None`),
    /// taken under the lock so trial division itself runs unlocked.
    pub fn divisors_below(&self, limit: u64, visible_len: Option<usize>) -> Result<Vec<u64>> {
        let state = self.state.guard()?;
        let visible = visible_len
            .unwrap_or(state.primes.len())
            .min(state.primes.len());
        Ok(state.primes[..visible]
            .iter()
            .copied()
            .filter(|p| *p < limit)
            .collect())
    }

    /// Sorted copy of everything confirmed so far. Used by the coordinator
    /// once all workers have been joined.
    pub fn sorted_snapshot(&self) -> Result<Vec<u64>> {
        let state = self.state.guard()?;
        let mut primes = state.primes.clone();
        primes.sort_unstable();
        debug!(count = primes.len(), "registry snapshot taken");
        Ok(primes)
    }
}
