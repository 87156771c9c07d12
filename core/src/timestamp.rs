//! The `yyyyMMdd.HHmmss.SSS` timestamp written to `ts.txt`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};

use crate::clock::Clock;
use crate::errors::TimestampParseError;

/// chrono spelling of `yyyyMMdd.HHmmss.SSS`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d.%H%M%S.%3f";

/// Rendered width: 8 date digits, dot, 6 time digits, dot, 3 millisecond digits.
pub const TIMESTAMP_LEN: usize = 19;

const DOT_POSITIONS: [usize; 2] = [8, 15];

/// A local wall-clock instant at millisecond precision.
///
/// Sub-millisecond precision is truncated on construction, so a value that
/// went through [`Display`](fmt::Display) and [`Timestamp::parse`] compares
/// equal to the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    #[must_use]
    pub fn from_naive(at: NaiveDateTime) -> Self {
        let truncated = at.nanosecond() / 1_000_000 * 1_000_000;
        Self(at.with_nanosecond(truncated).unwrap_or(at))
    }

    /// Reads `clock` once.
    #[must_use]
    pub fn capture(clock: &impl Clock) -> Self {
        Self::from_naive(clock.now())
    }

    /// Strict inverse of `Display`.
    ///
    /// Surrounding whitespace, a trailing newline, signs, and short fields are
    /// all rejected; the input must be exactly [`TIMESTAMP_LEN`] bytes.
    pub fn parse(raw: &str) -> Result<Self, TimestampParseError> {
        let bytes = raw.as_bytes();
        if bytes.len() != TIMESTAMP_LEN {
            return Err(TimestampParseError::Length {
                expected: TIMESTAMP_LEN,
                found: bytes.len(),
            });
        }

        for (position, byte) in bytes.iter().enumerate() {
            let well_formed = if DOT_POSITIONS.contains(&position) {
                *byte == b'.'
            } else {
                byte.is_ascii_digit()
            };
            if !well_formed {
                return Err(TimestampParseError::Shape { position });
            }
        }

        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| TimestampParseError::OutOfRange)
    }

    #[must_use]
    pub const fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    #[must_use]
    pub fn millisecond(&self) -> u32 {
        self.0.nanosecond() / 1_000_000
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(at: NaiveDateTime) -> Self {
        Self::from_naive(at)
    }
}
