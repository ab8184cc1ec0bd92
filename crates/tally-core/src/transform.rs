//! Counter transforms.
//!
//! Every operation is a pure function of its input. The admissible range is
//! checked on the *input* before transforming, never on the result:
//! increment guards the upper side, decrement the lower side, echo both.

use crate::error::{Result, TallyError};

/// Lower bound of the admissible range (inclusive).
pub const MIN_VALUE: i64 = -10_000;
/// Upper bound of the admissible range (inclusive).
pub const MAX_VALUE: i64 = 10_000;

/// Whether `v` lies in `[MIN_VALUE, MAX_VALUE]`.
pub fn is_admissible(v: i64) -> bool {
    (MIN_VALUE..=MAX_VALUE).contains(&v)
}

/// `v + 1`. Rejects inputs at or above `MAX_VALUE`.
pub fn increment(v: i64) -> Result<i64> {
    if v >= MAX_VALUE {
        return Err(TallyError::RangeExceeded { value: v });
    }
    Ok(v + 1)
}

/// `v - 1`. Rejects inputs at or below `MIN_VALUE`.
pub fn decrement(v: i64) -> Result<i64> {
    if v <= MIN_VALUE {
        return Err(TallyError::RangeExceeded { value: v });
    }
    Ok(v - 1)
}

/// Identity for admissible inputs.
pub fn echo(v: i64) -> Result<i64> {
    if !is_admissible(v) {
        return Err(TallyError::RangeExceeded { value: v });
    }
    Ok(v)
}

/// Always zero.
pub fn reset() -> i64 {
    0
}

/// Closed set of counter operations exposed over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Increment,
    Decrement,
    Echo,
    Reset,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Increment, Op::Decrement, Op::Echo, Op::Reset];

    /// Stable lowercase name (logs, metric labels, test vectors).
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Increment => "increment",
            Op::Decrement => "decrement",
            Op::Echo => "echo",
            Op::Reset => "reset",
        }
    }

    /// Apply this operation to `v`.
    pub fn apply(self, v: i64) -> Result<i64> {
        match self {
            Op::Increment => increment(v),
            Op::Decrement => decrement(v),
            Op::Echo => echo(v),
            Op::Reset => Ok(reset()),
        }
    }
}
