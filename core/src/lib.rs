//! Core domain logic for tsmark.
//!
//! - **`clock`**: the only place the system clock is read
//! - **`timestamp`**: the `yyyyMMdd.HHmmss.SSS` value and its codec
//! - **`errors`**: failure types and the error-stream diagnostic
//! - **`runner`**: start line, stamp `ts.txt`, finish line

pub mod clock;
pub mod errors;
pub mod runner;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{OriginTrace, StampError, TimestampParseError, diagnostic};
pub use runner::{FINISH_MESSAGE, OUTPUT_FILE_NAME, Runner, START_MESSAGE, write_timestamp};
pub use timestamp::{TIMESTAMP_FORMAT, TIMESTAMP_LEN, Timestamp};
