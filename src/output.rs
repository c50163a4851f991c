//! Final aggregation: {2, 3} seeding, bound filtering, file write and
//! console echo.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::core::errors::{Result, SieveError};
use crate::sieve::SieveReport;

/// Assemble the user-facing list: the two primes the mod-12 partitioning
/// never tests, then everything the registry confirmed, all filtered to the
/// requested bound. The filter also applies to {2, 3}, so a bound of 1
/// yields an empty list and a bound of 2 yields just [2]; the last round's
/// overshoot past the bound is dropped the same way.
pub fn assemble(report: &SieveReport, bound: u64) -> Vec<u64> {
    let mut primes: Vec<u64> = [2u64, 3].into_iter().filter(|p| *p <= bound).collect();
    primes.extend(report.primes.iter().copied().filter(|p| *p <= bound));
    primes
}

/// Write the primes to `path`, one per line.
pub fn write_primes(primes: &[u64], path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|err| SieveError::io(format!("creating {}", path.display()), err))?;
    let mut out = BufWriter::new(file);
    for prime in primes {
        writeln!(out, "{prime}")
            .map_err(|err| SieveError::io(format!("writing {}", path.display()), err))?;
    }
    out.flush()
        .map_err(|err| SieveError::io(format!("flushing {}", path.display()), err))?;
    info!(count = primes.len(), path = %path.display(), "primes written");
    Ok(())
}

/// Console echo, suppressed by the quiet flag at the call site.
pub fn echo_primes(primes: &[u64]) {
    println!("--- PRIMES ---");
    for prime in primes {
        println!("{prime}");
    }
}
