//! Flat error taxonomy returned by every fallible engine operation.

use thiserror::Error;

/// Every failure the engine can produce. There is no local recovery: any
/// `Err` aborts the current top-level call (`compute_address` or
/// `prepare_to_sign`) and is surfaced to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed BoC, oversized counts, bad `d1` flags, out-of-range
    /// references, bad framing, bad address type, truncated buffer.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Message header `input_id` did not match the expected constant.
    #[error("invalid input id: expected 0x{expected:08x}, got 0x{actual:08x}")]
    InvalidInputId { expected: u32, actual: u32 },

    /// Message source address does not match the caller-supplied expected
    /// source address.
    #[error("message source address does not match expected address")]
    InvalidSrcAddress,

    /// The SHA-256 primitive returned something other than 32 bytes.
    #[error("hash primitive failed")]
    InvalidHash,

    /// A slice operation was attempted on a null or uninitialized view.
    #[error("slice is empty")]
    SliceEmpty,

    /// A read or write went past the current slice window.
    #[error("cell underflow")]
    CellUnderflow,

    /// A `bits` argument fell outside the allowed range for the operation.
    #[error("range check failed: {0}")]
    RangeCheck(String),

    /// A dictionary label was not encoded in the short-long form.
    #[error("wrong label encoding")]
    WrongLabel,

    /// Dictionary descent attempted a right branch, or the key contained a
    /// non-zero byte.
    #[error("invalid dictionary key")]
    InvalidKey,

    /// The public-key leaf cell was located but carries no valid
    /// label-size record.
    #[error("cell is empty")]
    CellIsEmpty,
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn invalid_data(msg: impl Into<String>) -> Self {
        EngineError::InvalidData(msg.into())
    }

    pub(crate) fn range_check(msg: impl Into<String>) -> Self {
        EngineError::RangeCheck(msg.into())
    }
}
