//! Interrupt-driven shutdown path.
//!
//! Signal delivery and the interactive confirmation are deliberately split:
//! the signal context only notifies, and a dedicated blocking task owns the
//! prompt. The confirmed outcome is an explicitly owned flag handle passed
//! into the coordinator - no ambient global state.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::errors::{Result, SieveError};

/// Process-wide shutdown marker: set at most once, never reset, readable by
/// anyone holding a clone of the handle.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    inner: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag. Returns true only for the call that actually set it.
    pub fn trigger(&self) -> bool {
        !self.inner.swap(true, Ordering::SeqCst)
    }

    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}

/// Listens for interrupt signals and, on user confirmation, sets the
/// shutdown flag exactly once.
pub struct ShutdownController {
    flag: ShutdownFlag,
    prompting: Arc<AtomicBool>,
}

impl ShutdownController {
    pub fn new(flag: ShutdownFlag) -> Self {
        Self {
            flag,
            prompting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the signal loop. Returns once shutdown has been confirmed; a
    /// declined prompt re-arms the listener. Signals arriving while a
    /// prompt is already in progress are ignored, so no second prompt can
    /// stack and the flag can never be set twice.
    pub async fn listen(self) -> Result<()> {
        loop {
            tokio::signal::ctrl_c()
                .await
                .map_err(|err| SieveError::io("waiting for interrupt signal", err))?;

            if self.flag.is_set() {
                return Ok(());
            }
            if self.prompting.swap(true, Ordering::SeqCst) {
                continue;
            }

            info!("interrupt received, asking for confirmation");
            let confirmed = tokio::task::spawn_blocking(confirm_via_stdin)
                .await
                .map_err(|_| SieveError::synchronization("confirmation prompt task failed"))?
                .map_err(|err| SieveError::io("reading shutdown confirmation", err))?;

            if confirmed {
                self.flag.trigger();
                info!("shutdown confirmed, dumping discovered primes");
                return Ok(());
            }
            info!("shutdown declined, resuming");
            self.prompting.store(false, Ordering::SeqCst);
        }
    }
}

/// Interpret one line of prompt input: first non-space character decides,
/// anything else re-prompts.
fn parse_confirmation(line: &str) -> Option<bool> {
    match line.trim().chars().next() {
        Some('y') | Some('Y') => Some(true),
        Some('n') | Some('N') => Some(false),
        _ => None,
    }
}

/// Blocking prompt loop on stdin. Runs on a dedicated blocking task, never
/// in signal context.
fn confirm_via_stdin() -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    writeln!(stdout, "\nDump and shutdown? (y/n)")?;
    stdout.flush()?;
    loop {
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // stdin closed mid-prompt; treat as declined rather than
            // killing a run the user never confirmed away
            warn!("stdin closed during shutdown prompt, resuming");
            return Ok(false);
        }
        if let Some(answer) = parse_confirmation(&line) {
            return Ok(answer);
        }
        writeln!(stdout, "type 'y' or 'n'.\n\nDump and shutdown? (y/n)")?;
        stdout.flush()?;
    }
}
