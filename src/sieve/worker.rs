//! Worker loop: one candidate per round, trial division against the
//! registry's visible prefix, append on success via the barrier's atomic
//! completion step.

use tracing::debug;

use super::barrier::RoundBarrier;
use super::candidates::BASES;
use super::registry::PrimeRegistry;
use super::types::DivisorView;
use crate::core::errors::Result;

/// Immutable per-worker configuration, created once at dispatch.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    /// Worker identity in 0..WORKERS.
    pub id: usize,
    pub total_rounds: usize,
    pub divisor_view: DivisorView,
    pub registry: PrimeRegistry,
    pub barrier: RoundBarrier,
}

/// Divisor scan cutoff. The +12 margin over-tests a few registry entries
/// past the mathematically necessary sqrt cutoff, as a hedge against a
/// worker's lagging view of the registry under
/// `DivisorView::CachedReference`.
fn scan_limit(candidate: u64) -> u64 {
    (candidate as f64).sqrt() as u64 + 12
}

/// Body of one worker thread. Runs until every round has been dispatched or
/// the barrier is halted; both are observed at round boundaries only, so an
/// in-flight test always completes and the registry is never left torn from
/// this worker's perspective.
pub fn run(ctx: WorkerContext) -> Result<()> {
    // Consume the pre-armed permit; without this first acquire the gate
    // accounting would be off by one for the whole run.
    ctx.barrier.wait_release(ctx.id)?;

    let mut cached_len = ctx.registry.snapshot_len()?;
    let mut candidate = BASES[ctx.id];
    let mut confirmed_total = 0usize;

    loop {
        if ctx.barrier.should_stop(ctx.total_rounds)? {
            break;
        }

        let visible = match ctx.divisor_view {
            DivisorView::Live => None,
            DivisorView::CachedReference => Some(cached_len),
        };
        let divisors = ctx.registry.divisors_below(scan_limit(candidate), visible)?;
        let is_prime = divisors.iter().all(|d| candidate % d != 0);

        let len_after = ctx
            .barrier
            .complete_round(ctx.id, is_prime.then_some(candidate))?;
        if is_prime {
            // Only a worker's own append refreshes its cached view; that
            // asymmetry is exactly the reference behavior CachedReference
            // preserves. Under Live the cache is simply unused.
            cached_len = len_after;
            confirmed_total += 1;
        }

        ctx.barrier.wait_release(ctx.id)?;
        candidate += 12;
    }

    debug!(
        worker = ctx.id,
        confirmed = confirmed_total,
        "worker exiting"
    );
    Ok(())
}
