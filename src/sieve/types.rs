use std::sync::{Mutex, MutexGuard};

use crate::core::errors::Result;

/// Number of worker threads; the mod-12 partitioning is built around
/// exactly four residue classes, so this is not configurable.
pub const WORKERS: usize = 4;

/// How a worker bounds its trial-division scan against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivisorView {
    /// Re-fetch the live registry length every round.
    #[default]
    Live,
    /// Cache the length observed at dispatch and refresh it only when this
    /// worker itself appends a prime. Reproduces the reference program's
    /// lagging view, which the +12 scan margin papers over but does not
    /// fully eliminate.
    CachedReference,
}

/// Configuration for one sieve run.
#[derive(Debug, Clone, Copy)]
pub struct SieveConfig {
    /// Largest value that must be covered by some worker's candidate.
    pub bound: u64,
    pub divisor_view: DivisorView,
}

impl SieveConfig {
    pub fn new(bound: u64) -> Self {
        Self {
            bound,
            divisor_view: DivisorView::default(),
        }
    }
}

/// Outcome of a sieve run.
///
/// An interrupted run is not an error: `primes` is still a sorted,
/// duplicate-free subset consistent with the rounds that completed.
#[derive(Debug, Clone)]
pub struct SieveReport {
    /// Confirmed primes from the registry, sorted ascending. Contains only
    /// values >= 5; {2, 3} are the output layer's job. May contain values
    /// past the bound (the last round overshoots), which the output layer
    /// filters.
    pub primes: Vec<u64>,
    /// Round index the barrier had reached when the run ended.
    pub rounds_completed: usize,
    pub total_rounds: usize,
    pub interrupted: bool,
}

/// Everything the single core lock protects: the prime registry and the
/// barrier's round state live under one mutex so that an append, the
/// completion report that follows it, and round advancement are
/// consistently ordered.
#[derive(Debug)]
pub(crate) struct CoreState {
    pub primes: Vec<u64>,
    /// Current round index; advances only when `completed` reaches WORKERS.
    pub round: usize,
    /// Workers that have reported for the current round, in [0, WORKERS].
    pub completed: usize,
    /// Cooperative stop marker; once set, workers exit at their next
    /// round boundary.
    pub halted: bool,
}

/// The shared cell behind both `PrimeRegistry` and `RoundBarrier`.
#[derive(Debug)]
pub struct SieveState {
    inner: Mutex<CoreState>,
}

impl SieveState {
    /// Seeded with 5 so the very first round has a divisor to scan; worker
    /// 0's first candidate is 5 itself, which divides evenly and is
    /// therefore never appended a second time.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CoreState {
                primes: vec![5],
                round: 0,
                completed: 0,
                halted: false,
            }),
        }
    }

    pub(crate) fn guard(&self) -> Result<MutexGuard<'_, CoreState>> {
        Ok(self.inner.lock()?)
    }
}

impl Default for SieveState {
    fn default() -> Self {
        Self::new()
    }
}
