use thiserror::Error;

/// Errors produced by trit/tryte conversions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// A non-integer was passed where a whole number is required.
    #[error("illegal conversion input: {0} is not a whole number")]
    IllegalInput(String),

    #[error("invalid trytes: {0}")]
    InvalidTrytes(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A balanced-ternary value does not fit the requested native integer.
    #[error("value out of range for {0}")]
    ValueOutOfRange(&'static str),
}

/// Convenience alias for conversion results.
pub type ConvertResult<T> = Result<T, ConvertError>;
