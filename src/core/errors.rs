use std::sync::PoisonError;
use thiserror::Error;

/// Unified error type for the primeflow library
#[derive(Debug, Error)]
pub enum SieveError {
    /// Bound validation errors (caught at the CLI boundary, before dispatch)
    #[error("Invalid bound: {bound} (must be at least 1)")]
    InvalidBound { bound: u64 },

    /// Resource exhaustion during dispatch (thread spawn, etc.) - fatal
    #[error("Resource exhausted during {operation}")]
    ResourceExhaustion {
        operation: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Barrier protocol invariant violations - must never fire under a
    /// correct implementation, and are asserted against in tests rather
    /// than recovered from
    #[error("Synchronization invariant violated: {message}")]
    Synchronization { message: String },

    /// IO errors on the output path
    #[error("IO operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl SieveError {
    /// Create a resource exhaustion error with source
    pub fn resource<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::ResourceExhaustion {
            operation: operation.into(),
            source: Some(source),
        }
    }

    /// Create a synchronization invariant violation
    pub fn synchronization<S: Into<String>>(message: S) -> Self {
        Self::Synchronization {
            message: message.into(),
        }
    }

    /// Create an IO error with context
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

// A poisoned lock means a worker panicked mid-round; the protocol state
// can no longer be trusted, so it surfaces as a synchronization failure.
impl<G> From<PoisonError<G>> for SieveError {
    fn from(_: PoisonError<G>) -> Self {
        SieveError::synchronization("core lock poisoned by a panicked thread")
    }
}

pub type Result<T> = std::result::Result<T, SieveError>;
