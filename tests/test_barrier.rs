//! Barrier protocol properties under adversarial scheduling.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use primeflow::sieve::{PrimeRegistry, RoundBarrier, SieveState, WORKERS};
use primeflow::SieveError;

fn fresh_barrier() -> (RoundBarrier, PrimeRegistry) {
    let state = Arc::new(SieveState::new());
    (
        RoundBarrier::new(Arc::clone(&state)),
        PrimeRegistry::new(state),
    )
}

#[test]
fn exactly_four_completions_per_round_under_randomized_scheduling() {
    let rounds = 200;
    let (barrier, _) = fresh_barrier();

    let mut handles = Vec::new();
    for w in 0..WORKERS {
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || -> primeflow::Result<()> {
            for _ in 0..rounds {
                barrier.wait_release(w)?;
                thread::sleep(Duration::from_micros(fastrand::u64(..200)));
                barrier.complete_round(w, None)?;
            }
            Ok(())
        }));
    }

    let mut advanced = 0;
    while barrier.current_round().unwrap() < rounds {
        let completed = barrier.completed().unwrap();
        assert!(
            completed <= WORKERS,
            "completion count {completed} exceeded worker count"
        );
        let before = barrier.current_round().unwrap();
        if barrier.try_advance().unwrap() {
            advanced += 1;
            assert_eq!(barrier.current_round().unwrap(), before + 1);
        }
        thread::yield_now();
    }
    assert_eq!(advanced, rounds);

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
}

#[test]
fn halt_releases_parked_workers() {
    let (barrier, _) = fresh_barrier();

    let mut handles = Vec::new();
    for w in 0..WORKERS {
        let barrier = barrier.clone();
        handles.push(thread::spawn(move || -> primeflow::Result<()> {
            barrier.wait_release(w)?;
            loop {
                if barrier.should_stop(usize::MAX)? {
                    break;
                }
                barrier.complete_round(w, None)?;
                barrier.wait_release(w)?;
            }
            Ok(())
        }));
    }

    // Let a few rounds advance before pulling the plug.
    while barrier.current_round().unwrap() < 5 {
        barrier.try_advance().unwrap();
        thread::yield_now();
    }
    barrier.halt().unwrap();

    // The join itself is the assertion: a worker left parked on its gate
    // would hang the test.
    for handle in handles {
        handle.join().unwrap().unwrap();
    }
}

#[test]
fn appends_ride_the_completion_step() {
    let (barrier, registry) = fresh_barrier();
    assert_eq!(registry.snapshot_len().unwrap(), 1, "registry starts seeded");

    barrier.wait_release(0).unwrap();
    let len_after = barrier.complete_round(0, Some(7)).unwrap();
    assert_eq!(len_after, 2);
    assert_eq!(registry.divisors_below(20, None).unwrap(), vec![5, 7]);

    // A visible prefix of one entry hides the newer append.
    assert_eq!(registry.divisors_below(20, Some(1)).unwrap(), vec![5]);
}

#[test]
fn fifth_completion_report_is_rejected() {
    let (barrier, _) = fresh_barrier();
    for w in 0..WORKERS {
        barrier.wait_release(w).unwrap();
        barrier.complete_round(w, None).unwrap();
    }
    let err = barrier.complete_round(0, None).unwrap_err();
    assert!(matches!(err, SieveError::Synchronization { .. }));
}

#[test]
fn double_release_is_an_invariant_violation() {
    let (barrier, _) = fresh_barrier();
    for w in 0..WORKERS {
        barrier.wait_release(w).unwrap();
        barrier.complete_round(w, None).unwrap();
    }
    assert!(barrier.try_advance().unwrap());

    // Nobody consumed the permits from the first advancement, so a second
    // advancement must trip the gate invariant instead of stacking permits.
    for w in 0..WORKERS {
        barrier.complete_round(w, None).unwrap();
    }
    let err = barrier.try_advance().unwrap_err();
    assert!(matches!(err, SieveError::Synchronization { .. }));
}

#[test]
fn gates_start_pre_armed() {
    let (barrier, _) = fresh_barrier();
    // Would deadlock the test if the first-round permits were missing.
    for w in 0..WORKERS {
        barrier.wait_release(w).unwrap();
    }
}
