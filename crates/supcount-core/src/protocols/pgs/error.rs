use thiserror::Error;

/// Errors returned while decoding a PGS stream.
///
/// # Examples
/// ```
/// use supcount_core::protocols::pgs::error::PgsError;
///
/// let err = PgsError::Malformed { expected: 0x50, actual: 0x58, offset: 0 };
/// assert_eq!(err.to_string(), "expected 0x50, got 0x58 @offset 0");
/// ```
#[derive(Debug, Error)]
pub enum PgsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected {expected:#04x}, got {actual:#04x} @offset {offset}")]
    Malformed { expected: u8, actual: u8, offset: u64 },
    #[error("unexpected end of stream: need {needed} bytes @offset {offset}")]
    Truncated { offset: u64, needed: usize },
}
