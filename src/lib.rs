// Core infrastructure modules
pub mod core {
    pub mod errors;
}

pub mod output;
pub mod shutdown;
pub mod sieve;

// Re-exports for convenience
pub use self::core::errors::{Result, SieveError};
pub use self::shutdown::{ShutdownController, ShutdownFlag};
pub use self::sieve::{
    Coordinator, DivisorView, PrimeRegistry, RoundBarrier, SieveConfig, SieveReport, WORKERS,
};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn end_to_end_small_run() {
        let config = SieveConfig::new(30);
        let report = Coordinator::new(config, ShutdownFlag::new())
            .run()
            .unwrap();

        assert!(!report.interrupted);
        assert_eq!(report.rounds_completed, report.total_rounds);

        let primes = output::assemble(&report, 30);
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }
}
