use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tern_types::Trit;

use crate::curl::Curl;
use crate::kerl::Kerl;
use crate::HASH_LENGTH;

/// Absorb/squeeze hash interface shared by [`Curl`] and [`Kerl`].
///
/// A sponge exclusively owns its state. Instances are cheap to create and
/// must never be shared between independent derivations.
pub trait Sponge {
    /// Return the sponge to its freshly constructed state.
    fn reset(&mut self);

    /// Absorb `length` trits of `trits` starting at `offset`.
    fn absorb(&mut self, trits: &[Trit], offset: usize, length: usize) -> SpongeResult<()>;

    /// Squeeze `length` trits into `trits` starting at `offset`.
    fn squeeze(&mut self, trits: &mut [Trit], offset: usize, length: usize) -> SpongeResult<()>;

    /// Reset, absorb all of `input`, and squeeze one hash.
    fn hash(&mut self, input: &[Trit]) -> SpongeResult<Vec<Trit>> {
        self.reset();
        self.absorb(input, 0, input.len())?;
        let mut out = vec![0; HASH_LENGTH];
        self.squeeze(&mut out, 0, HASH_LENGTH)?;
        Ok(out)
    }
}

/// Selects a sponge implementation at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpongeKind {
    /// Curl with 27 rounds.
    Curl27,
    /// Curl with 81 rounds (transaction hashing).
    Curl81,
    /// Keccak-384 adapter.
    Kerl,
}

impl SpongeKind {
    /// Build a fresh sponge of this kind.
    pub fn create(self) -> Box<dyn Sponge + Send> {
        match self {
            Self::Curl27 => Box::new(Curl::with_rounds(27)),
            Self::Curl81 => Box::new(Curl::with_rounds(81)),
            Self::Kerl => Box::new(Kerl::new()),
        }
    }
}

impl fmt::Display for SpongeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Curl27 => "curl27",
            Self::Curl81 => "curl81",
            Self::Kerl => "kerl",
        };
        f.write_str(name)
    }
}

impl FromStr for SpongeKind {
    type Err = SpongeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "curl27" => Ok(Self::Curl27),
            "curl" | "curl81" => Ok(Self::Curl81),
            "kerl" => Ok(Self::Kerl),
            other => Err(SpongeError::UnknownKind(other.to_owned())),
        }
    }
}

/// Errors from sponge operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpongeError {
    /// Curl only supports 27 or 81 rounds.
    #[error("illegal number of rounds: {0} (only 27 and 81 are supported)")]
    IllegalRounds(usize),

    /// Kerl absorbs and squeezes whole 243-trit chunks only.
    #[error("illegal length: {0} is not a multiple of 243")]
    IllegalLength(usize),

    #[error("buffer too short: need {needed} trits, have {actual}")]
    BufferTooShort { needed: usize, actual: usize },

    #[error("unknown sponge kind: {0}")]
    UnknownKind(String),
}

/// Convenience alias for sponge results.
pub type SpongeResult<T> = Result<T, SpongeError>;

/// Check that `offset..offset + length` lies inside a buffer of `len` trits.
pub(crate) fn check_bounds(len: usize, offset: usize, length: usize) -> SpongeResult<()> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(()),
        _ => Err(SpongeError::BufferTooShort {
            needed: offset.saturating_add(length),
            actual: len,
        }),
    }
}
