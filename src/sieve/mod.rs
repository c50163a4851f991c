//! Lockstep trial-division sieve: four workers, one shared registry, one
//! custom round barrier.

pub mod barrier;
pub mod candidates;
pub mod coordinator;
pub mod registry;
pub mod types;
pub mod worker;

pub use barrier::RoundBarrier;
pub use coordinator::Coordinator;
pub use registry::PrimeRegistry;
pub use types::{DivisorView, SieveConfig, SieveReport, SieveState, WORKERS};
pub use worker::WorkerContext;
