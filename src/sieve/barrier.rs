//! Round barrier - the heart of the lockstep protocol.
//!
//! Four workers and one coordinator rendezvous here once per round. Each
//! worker, after finishing its trial-division test, performs one atomic
//! step under the core lock: append any confirmed prime and increment the
//! completion counter. It then blocks on its private release gate. The
//! coordinator busy-polls the counter; at four it advances the round index,
//! resets the counter and releases every gate exactly once, all before
//! dropping the lock. This is a custom protocol rather than a library
//! barrier because the coordinator side must stay non-blocking and because
//! registry appends have to ride the same lock acquisition as the
//! completion report.

use std::sync::{Arc, Condvar, Mutex};

use tracing::{debug, trace};

use super::types::{SieveState, WORKERS};
use crate::core::errors::{Result, SieveError};

/// One worker's private release signal: a binary semaphore that starts
/// pre-armed so the first round can begin without a coordinator release.
#[derive(Debug)]
pub struct ReleaseGate {
    permits: Mutex<u8>,
    signal: Condvar,
}

impl ReleaseGate {
    fn new_armed() -> Self {
        Self {
            permits: Mutex::new(1),
            signal: Condvar::new(),
        }
    }

    /// Block until a permit is available, then consume it.
    fn acquire(&self) -> Result<()> {
        let mut permits = self.permits.lock()?;
        while *permits == 0 {
            permits = self.signal.wait(permits)?;
        }
        *permits -= 1;
        Ok(())
    }

    /// Grant exactly one permit. A permit that was never consumed means the
    /// protocol released the same worker twice in one round.
    fn release(&self) -> Result<()> {
        let mut permits = self.permits.lock()?;
        if *permits != 0 {
            return Err(SieveError::synchronization(
                "release gate granted a second permit before the first was consumed",
            ));
        }
        *permits = 1;
        self.signal.notify_one();
        Ok(())
    }

    /// Idempotent release used on the halt path, where a worker may or may
    /// not already hold an unconsumed permit from the final advancement.
    fn release_for_halt(&self) -> Result<()> {
        let mut permits = self.permits.lock()?;
        *permits = 1;
        self.signal.notify_one();
        Ok(())
    }
}

/// The shared barrier handle.
#[derive(Debug, Clone)]
pub struct RoundBarrier {
    state: Arc<SieveState>,
    gates: Arc<[ReleaseGate; WORKERS]>,
}

impl RoundBarrier {
    pub fn new(state: Arc<SieveState>) -> Self {
        Self {
            state,
            gates: Arc::new([
                ReleaseGate::new_armed(),
                ReleaseGate::new_armed(),
                ReleaseGate::new_armed(),
                ReleaseGate::new_armed(),
            ]),
        }
    }

    pub fn current_round(&self) -> Result<usize> {
        Ok(self.state.guard()?.round)
    }

    /// Completion count for the current round; exposed for instrumentation
    /// and the scheduling property tests.
    pub fn completed(&self) -> Result<usize> {
        Ok(self.state.guard()?.completed)
    }

    /// Whether a worker should stop before testing another candidate:
    /// either every round has been dispatched or the coordinator halted the
    /// run. Deliberately does not consult the shutdown flag - an in-flight
    /// test always runs to completion.
    pub fn should_stop(&self, total_rounds: usize) -> Result<bool> {
        let state = self.state.guard()?;
        Ok(state.halted || state.round >= total_rounds)
    }

    /// A worker's end-of-round step: append the confirmed candidate (if
    /// any) and report completion, in one lock acquisition. Returns the
    /// registry length visible after the step, which a
    /// `DivisorView::CachedReference` worker uses to refresh its cache when
    /// it appended.
    pub fn complete_round(&self, worker: usize, confirmed: Option<u64>) -> Result<usize> {
        let mut state = self.state.guard()?;
        if let Some(prime) = confirmed {
            state.primes.push(prime);
            trace!(worker, prime, round = state.round, "confirmed prime");
        }
        state.completed += 1;
        if state.completed > WORKERS {
            return Err(SieveError::synchronization(format!(
                "completion count reached {} with only {WORKERS} workers",
                state.completed
            )));
        }
        Ok(state.primes.len())
    }

    /// Block the given worker until the coordinator releases its gate.
    pub fn wait_release(&self, worker: usize) -> Result<()> {
        self.gates[worker].acquire()
    }

    /// Coordinator poll step: if all workers have reported, advance the
    /// round, reset the counter and release every gate once. Returns true
    /// when a round was advanced.
    pub fn try_advance(&self) -> Result<bool> {
        let mut state = self.state.guard()?;
        if state.completed < WORKERS {
            return Ok(false);
        }
        if state.completed > WORKERS {
            return Err(SieveError::synchronization(format!(
                "completion count reached {} with only {WORKERS} workers",
                state.completed
            )));
        }
        state.round += 1;
        state.completed = 0;
        debug!(
            round = state.round,
            primes = state.primes.len(),
            "advancing round"
        );
        for gate in self.gates.iter() {
            gate.release()?;
        }
        Ok(true)
    }

    /// Cooperative stop: mark the run halted, then wake every worker so
    /// none stays parked on its gate. Workers observe the marker at their
    /// next round boundary and exit.
    pub fn halt(&self) -> Result<()> {
        {
            let mut state = self.state.guard()?;
            state.halted = true;
        }
        for gate in self.gates.iter() {
            gate.release_for_halt()?;
        }
        debug!("barrier halted, workers released for exit");
        Ok(())
    }
}
