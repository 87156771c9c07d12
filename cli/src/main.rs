//! tsmark CLI - binary entry point.
//!
//! ```text
//! main() -> init_tracing() -> Runner::new().run(stdout, stderr) -> ExitCode::SUCCESS
//! ```
//!
//! Takes no arguments. stdout carries exactly the start line and, on success,
//! `task finished`; logs and diagnostics go to stderr. A stamping failure is
//! reported on stderr and then dropped, so the exit status is always success.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tsmark_core::Runner;

const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("failed to build log filter")?;

    // stdout is reserved for the two console lines.
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(io::stderr))
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        let _ = writeln!(io::stderr(), "Warning: {e:#}");
    }

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    match Runner::new().run(&mut stdout, &mut stderr) {
        Ok(ts) => tracing::debug!(timestamp = %ts, "Run complete"),
        Err(err) => tracing::debug!(phase = err.kind(), "Run failed; error already reported"),
    }

    ExitCode::SUCCESS
}
