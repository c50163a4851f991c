//! Deterministic per-worker candidate arithmetic.
//!
//! Every prime above 3 is congruent to 1, 5, 7 or 11 mod 12. Worker w walks
//! the arithmetic progression BASES[w] + 12r, so the four workers jointly
//! cover all four residue classes (13 = 12 + 1 supplies the `1` class) and
//! {2, 3} are handled by the output layer instead.

use super::types::WORKERS;

/// First candidate for each worker.
pub const BASES: [u64; WORKERS] = [5, 7, 11, 13];

/// Candidate tested by `worker` in round `round`.
pub fn candidate(worker: usize, round: usize) -> u64 {
    BASES[worker] + 12 * round as u64
}

/// Number of lockstep rounds needed so every integer <= bound falls in some
/// worker's progression.
pub fn round_count(bound: u64) -> usize {
    ((bound + 11).div_ceil(12)) as usize
}
