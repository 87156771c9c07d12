//! Stamps `ts.txt` with the current timestamp.
//!
//! ```text
//! run() -> START_MESSAGE -> stamp() -> FINISH_MESSAGE
//!                              |
//!                              v (Err)
//!                        diagnostic() on stderr, error handed back
//! ```
//!
//! Failures are reported, not raised: [`Runner::run`] returns the error so
//! callers can inspect it, and the binary drops it.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::errors::{StampError, diagnostic};
use crate::timestamp::Timestamp;

pub const START_MESSAGE: &str = "进入HelloWorldApp，开始执行业务逻辑...";
pub const FINISH_MESSAGE: &str = "task finished";
pub const OUTPUT_FILE_NAME: &str = "ts.txt";

#[derive(Debug, Clone)]
pub struct Runner<C = SystemClock> {
    clock: C,
    output: PathBuf,
}

impl Runner<SystemClock> {
    /// Production runner: system clock, `ts.txt` in the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Runner<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Runner<C> {
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            output: PathBuf::from(OUTPUT_FILE_NAME),
        }
    }

    /// Resolves `ts.txt` inside `dir` instead of the working directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output = dir.as_ref().join(OUTPUT_FILE_NAME);
        self
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Captures the clock once and overwrites the output file with it.
    pub fn stamp(&self) -> Result<Timestamp, StampError> {
        let ts = Timestamp::capture(&self.clock);
        debug!(timestamp = %ts, "Captured timestamp");

        write_timestamp(&self.output, &ts)?;
        debug!(path = %self.output.display(), timestamp = %ts, "Wrote timestamp");
        Ok(ts)
    }

    /// Full run against the given console streams.
    ///
    /// Writes the start line, stamps the file, then either the finish line or
    /// a diagnostic. Console write errors are ignored; only stamping failures
    /// come back as `Err`.
    pub fn run<O, E>(&self, stdout: &mut O, stderr: &mut E) -> Result<Timestamp, StampError>
    where
        O: Write,
        E: Write,
    {
        let _ = writeln!(stdout, "{START_MESSAGE}");
        let _ = stdout.flush();

        match self.stamp() {
            Ok(ts) => {
                let _ = writeln!(stdout, "{FINISH_MESSAGE}");
                let _ = stdout.flush();
                Ok(ts)
            }
            Err(err) => {
                debug!(
                    path = %err.path().display(),
                    phase = err.kind(),
                    error = %err,
                    "Stamping failed"
                );
                let _ = writeln!(stderr, "{}", diagnostic(&err));
                let _ = stderr.flush();
                Err(err)
            }
        }
    }
}

/// Creates or truncates `path` and writes `ts` as its entire content.
///
/// No trailing newline. The data is synced before returning so deferred
/// device errors (ENOSPC, NFS write-back) surface as `StampError::Write`
/// instead of being lost when the handle closes. The handle is dropped on
/// every exit path; a failed write may leave a truncated or partial file behind.
pub fn write_timestamp(path: &Path, ts: &Timestamp) -> Result<(), StampError> {
    let mut file = File::create(path).map_err(|e| StampError::open(path, e))?;
    write_all_synced(&mut file, ts.to_string().as_bytes())
        .map_err(|e| StampError::write(path, e))
}

fn write_all_synced(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    file.sync_all()
}
