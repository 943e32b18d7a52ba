use tern_crypto::SpongeError;
use tern_signing::SigningError;
use tern_types::ConvertError;
use thiserror::Error;

/// Errors produced while building, finalizing or decoding bundles.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleError {
    #[error("bundle has no transactions")]
    EmptyBundle,

    /// Every candidate bundle hash within the attempt budget was insecure.
    #[error("no secure bundle hash found after {attempts} attempts")]
    BundleHashSecurityRetryExceeded { attempts: usize },

    #[error("fragments {offset}..{end} exceed bundle of {len} transactions")]
    FragmentOutOfRange { offset: usize, end: usize, len: usize },

    #[error("invalid transaction trytes: {0}")]
    InvalidTrytes(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Sponge(#[from] SpongeError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Convenience alias for bundle results.
pub type BundleResult<T> = Result<T, BundleError>;
