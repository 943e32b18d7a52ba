use tern_crypto::SpongeError;
use tern_types::ConvertError;
use thiserror::Error;

/// Errors produced by key derivation, signing and verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The bundle hash is empty, not 81 trytes, or not trytes at all.
    #[error("invalid bundle hash: {0:?}")]
    InvalidBundleHash(String),

    #[error("illegal seed length: {0} trits is not a multiple of 3")]
    IllegalSeedLength(usize),

    #[error("invalid security level: {0} (expected 1, 2 or 3)")]
    InvalidSecurityLevel(u8),

    /// Private keys hold between one and three 6561-trit fragments.
    #[error("illegal key length: {0} trits")]
    IllegalKeyLength(usize),

    #[error("illegal fragment length: expected {expected}, got {actual}")]
    IllegalFragmentLength { expected: usize, actual: usize },

    #[error(transparent)]
    Sponge(#[from] SpongeError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Convenience alias for signing results.
pub type SigningResult<T> = Result<T, SigningError>;
