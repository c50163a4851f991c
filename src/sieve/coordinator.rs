//! Coordinator - dispatches the workers and drives round advancement.
//!
//! The coordinator never suspends on a blocking primitive while waiting for
//! workers: it busy-polls the barrier (yielding between polls) so round
//! advancement stays low-latency. Shutdown is cooperative - the coordinator
//! exits its polling loop, halts the barrier and joins every worker before
//! it reads the registry, so final output can never observe a torn append.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use super::barrier::RoundBarrier;
use super::candidates::round_count;
use super::registry::PrimeRegistry;
use super::types::{SieveConfig, SieveReport, SieveState, WORKERS};
use super::worker::{self, WorkerContext};
use crate::core::errors::{Result, SieveError};
use crate::shutdown::ShutdownFlag;

pub struct Coordinator {
    config: SieveConfig,
    shutdown: ShutdownFlag,
}

impl Coordinator {
    pub fn new(config: SieveConfig, shutdown: ShutdownFlag) -> Self {
        Self { config, shutdown }
    }

    /// Run the sieve to completion or to a confirmed shutdown. Blocking;
    /// callers on an async runtime drive this via `spawn_blocking`.
    pub fn run(self) -> Result<SieveReport> {
        let total_rounds = round_count(self.config.bound);
        let state = Arc::new(SieveState::new());
        let registry = PrimeRegistry::new(Arc::clone(&state));
        let barrier = RoundBarrier::new(state);

        info!(
            bound = self.config.bound,
            rounds = total_rounds,
            workers = WORKERS,
            "dispatching sieve workers"
        );

        let mut handles: Vec<JoinHandle<Result<()>>> = Vec::with_capacity(WORKERS);
        for id in 0..WORKERS {
            let ctx = WorkerContext {
                id,
                total_rounds,
                divisor_view: self.config.divisor_view,
                registry: registry.clone(),
                barrier: barrier.clone(),
            };
            let spawned = thread::Builder::new()
                .name(format!("sieve-worker-{id}"))
                .spawn(move || worker::run(ctx));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // No leaked partial dispatch: stop and reap whatever
                    // already started before surfacing the failure.
                    warn!(worker = id, error = %err, "worker spawn failed, halting dispatched workers");
                    barrier.halt()?;
                    if let Err(join_err) = join_all(handles) {
                        warn!(error = %join_err, "worker failed while unwinding partial dispatch");
                    }
                    return Err(SieveError::resource(
                        format!("spawning worker thread {id}"),
                        err,
                    ));
                }
            }
        }

        let mut interrupted = false;
        loop {
            if barrier.current_round()? >= total_rounds {
                break;
            }
            if self.shutdown.is_set() {
                interrupted = true;
                break;
            }
            barrier.try_advance()?;
            thread::yield_now();
        }

        if interrupted {
            info!("shutdown requested, waiting for workers to reach a safe stop");
            barrier.halt()?;
        }
        join_all(handles)?;

        let rounds_completed = barrier.current_round()?.min(total_rounds);
        let primes = registry.sorted_snapshot()?;
        info!(
            confirmed = primes.len(),
            rounds = rounds_completed,
            interrupted,
            "sieve run finished"
        );
        Ok(SieveReport {
            primes,
            rounds_completed,
            total_rounds,
            interrupted,
        })
    }
}

/// Join every worker, reporting the first failure after all have stopped.
/// A panicked worker surfaces as a synchronization failure: the protocol
/// state it held cannot be trusted.
fn join_all(handles: Vec<JoinHandle<Result<()>>>) -> Result<()> {
    let mut first_err = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                first_err.get_or_insert(err);
            }
            Err(_) => {
                first_err.get_or_insert(SieveError::synchronization("worker thread panicked"));
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
