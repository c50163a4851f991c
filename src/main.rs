use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use primeflow::{
    output, Coordinator, DivisorView, ShutdownController, ShutdownFlag, SieveConfig, SieveError,
};

/// Finds all prime numbers from 2 up to a maximum using four lockstep
/// worker threads. Primes are written to the output file and echoed to
/// stdout; interrupting with ^C offers to dump everything discovered so far
/// and shut down safely.
#[derive(Debug, Parser)]
#[command(name = "primeflow", version)]
struct Cli {
    /// Largest value to test for primality
    #[arg(short = 'n', long = "max", default_value_t = 100)]
    max: u64,

    /// Suppress console echo of the discovered primes
    #[arg(short, long)]
    quiet: bool,

    /// Reproduce the reference divisor view: workers cache the registry
    /// length they saw and refresh it only on their own appends
    #[arg(long)]
    reference_divisors: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// File the sorted primes are written to
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.max < 1 {
        return Err(SieveError::InvalidBound { bound: cli.max }.into());
    }

    let flag = ShutdownFlag::new();
    let listener = tokio::spawn(ShutdownController::new(flag.clone()).listen());

    let mut config = SieveConfig::new(cli.max);
    if cli.reference_divisors {
        config.divisor_view = DivisorView::CachedReference;
    }

    let coordinator = Coordinator::new(config, flag);
    let report = tokio::task::spawn_blocking(move || coordinator.run())
        .await
        .context("coordinator task failed")??;
    listener.abort();

    let primes = output::assemble(&report, cli.max);
    if !cli.quiet {
        output::echo_primes(&primes);
    }
    output::write_primes(&primes, &cli.output)?;

    let partial = if report.interrupted { " (partial)" } else { "" };
    println!(
        "wrote {} primes{} to {}",
        primes.len(),
        partial,
        cli.output.display()
    );
    Ok(())
}
