//! Interrupted-shutdown safety: a confirmed shutdown mid-run must still
//! produce a sorted, duplicate-free subset consistent with the rounds that
//! actually completed.

use std::thread;
use std::time::Duration;

use primeflow::{output, Coordinator, ShutdownFlag, SieveConfig};

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

#[test]
fn interrupted_run_yields_consistent_partial_output() {
    // Large enough that the run cannot possibly finish before the flag
    // fires; the coordinator observes it at a round boundary and halts.
    let bound = 10_000_000;
    let flag = ShutdownFlag::new();
    let trigger = flag.clone();

    let runner = thread::spawn(move || Coordinator::new(SieveConfig::new(bound), flag).run());
    thread::sleep(Duration::from_millis(25));
    trigger.trigger();

    let report = runner.join().unwrap().unwrap();
    assert!(report.interrupted);
    assert!(report.rounds_completed < report.total_rounds);

    assert!(
        report.primes.windows(2).all(|w| w[0] < w[1]),
        "partial output must stay strictly ascending"
    );
    for &p in &report.primes {
        assert!(is_prime(p), "{p} in partial output is composite");
    }

    // Nothing in the output may exceed what the in-flight round could have
    // legitimately confirmed.
    let max_confirmable = 13 + 12 * report.rounds_completed as u64;
    assert!(report.primes.iter().all(|&p| p <= max_confirmable));

    let primes = output::assemble(&report, bound);
    assert!(primes.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(&primes[..2], &[2, 3]);
}

#[test]
fn preset_shutdown_stops_at_the_first_round_boundary() {
    let flag = ShutdownFlag::new();
    flag.trigger();

    let report = Coordinator::new(SieveConfig::new(1_000_000), flag)
        .run()
        .unwrap();
    assert!(report.interrupted);
    assert_eq!(report.rounds_completed, 0);

    // Round 0 may or may not have finished before the halt, so the registry
    // holds the seed plus at most the first-round confirmations.
    assert!(report.primes.windows(2).all(|w| w[0] < w[1]));
    for &p in &report.primes {
        assert!([5, 7, 11, 13].contains(&p));
    }
}
