//! Failure types and the error-stream diagnostic.

use std::any::type_name;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as _;
use std::fmt::{self, Write as _};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Call stack captured where a failure surfaced.
///
/// Always captured, independent of `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`.
/// Frames may be unresolved when the binary carries no debug info.
pub struct OriginTrace(Backtrace);

impl OriginTrace {
    #[must_use]
    pub fn capture() -> Self {
        Self(Backtrace::force_capture())
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.0.status() == BacktraceStatus::Captured
    }
}

impl fmt::Debug for OriginTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for OriginTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// I/O failure while stamping the output file.
#[derive(Debug, Error)]
pub enum StampError {
    #[error("failed to open {} for writing", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
        trace: OriginTrace,
    },
    #[error("failed to write timestamp to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
        trace: OriginTrace,
    },
}

impl StampError {
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
            trace: OriginTrace::capture(),
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
            trace: OriginTrace::capture(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Write { path, .. } => path,
        }
    }

    /// Variant name, used as the phase in logs and diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Open { .. } => "Open",
            Self::Write { .. } => "Write",
        }
    }

    #[must_use]
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::Open { source, .. } | Self::Write { source, .. } => source.kind(),
        }
    }

    #[must_use]
    pub const fn trace(&self) -> &OriginTrace {
        match self {
            Self::Open { trace, .. } | Self::Write { trace, .. } => trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampParseError {
    #[error("timestamp must be {expected} bytes (got {found})")]
    Length { expected: usize, found: usize },
    #[error("unexpected character at byte {position}")]
    Shape { position: usize },
    #[error("timestamp fields are out of range")]
    OutOfRange,
}

/// Renders `err` for the error stream: type and message, the source chain,
/// then the origin call stack.
#[must_use]
pub fn diagnostic(err: &StampError) -> String {
    let mut out = format!("{}::{}: {err}", type_name::<StampError>(), err.kind());

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\nCaused by: {cause}");
        source = cause.source();
    }

    let _ = write!(out, "\nStack backtrace:\n{}", err.trace());

    out
}
