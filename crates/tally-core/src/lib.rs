//! Tally core: the counter contract, independent of any transport.
//!
//! This crate owns the admissible range, the four counter transforms, the
//! lenient payload decoder and the shared error type. It intentionally carries
//! no transport or runtime dependencies so the HTTP gateway (and tests) can
//! reuse it as-is.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `TallyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod transform;

/// Shared result type.
pub use error::{Result, TallyError};
pub use protocol::CounterValue;
pub use transform::{Op, MAX_VALUE, MIN_VALUE};
