use std::fmt;

use serde::{Deserialize, Serialize};
use tern_crypto::{Kerl, Sponge, HASH_LENGTH};
use tern_types::{add, from_value, pad_trits, Trit};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{SigningError, SigningResult};
use crate::{CHUNKS_PER_FRAGMENT, KEY_FRAGMENT_LENGTH};

/// Number of key fragments (and therefore signature fragments) per key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SecurityLevel {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn fragments(self) -> usize {
        self as usize
    }

    /// Private key length in trits.
    pub fn key_length(self) -> usize {
        self.fragments() * KEY_FRAGMENT_LENGTH
    }
}

impl TryFrom<u8> for SecurityLevel {
    type Error = SigningError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(SigningError::InvalidSecurityLevel(other)),
        }
    }
}

impl From<SecurityLevel> for u8 {
    fn from(level: SecurityLevel) -> u8 {
        level as u8
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// W-OTS private key: `security × 6561` trits, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    trits: Vec<Trit>,
    #[zeroize(skip)]
    security: SecurityLevel,
}

impl PrivateKey {
    /// Wrap raw key trits. The length must be 1, 2 or 3 whole fragments.
    pub fn from_trits(trits: Vec<Trit>) -> SigningResult<Self> {
        let len = trits.len();
        if len == 0 || len % KEY_FRAGMENT_LENGTH != 0 {
            return Err(SigningError::IllegalKeyLength(len));
        }
        let fragments = u8::try_from(len / KEY_FRAGMENT_LENGTH)
            .map_err(|_| SigningError::IllegalKeyLength(len))?;
        let security =
            SecurityLevel::try_from(fragments).map_err(|_| SigningError::IllegalKeyLength(len))?;
        Ok(Self { trits, security })
    }

    pub fn security(&self) -> SecurityLevel {
        self.security
    }

    pub fn as_trits(&self) -> &[Trit] {
        &self.trits
    }

    /// The `index`-th 6561-trit key fragment.
    pub fn fragment(&self, index: usize) -> Option<&[Trit]> {
        self.trits.chunks_exact(KEY_FRAGMENT_LENGTH).nth(index)
    }

    pub fn fragments(&self) -> impl Iterator<Item = &[Trit]> {
        self.trits.chunks_exact(KEY_FRAGMENT_LENGTH)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(security={}, <redacted>)", self.security)
    }
}

/// Derive the subseed for `index`: `seed + index`, zero-padded to whole
/// hashes and passed once through Kerl.
pub fn subseed(seed: &[Trit], index: u64) -> SigningResult<Zeroizing<Vec<Trit>>> {
    if seed.len() % 3 != 0 {
        return Err(SigningError::IllegalSeedLength(seed.len()));
    }

    let sum = Zeroizing::new(add(seed, &from_value(index)));
    let padded_len = sum.len().div_ceil(HASH_LENGTH).max(1) * HASH_LENGTH;
    let mut trits = Zeroizing::new(pad_trits(&sum, padded_len));

    let mut kerl = Kerl::new();
    kerl.absorb(&trits, 0, padded_len)?;
    kerl.squeeze(&mut trits, 0, padded_len)?;

    debug!(index, len = padded_len, "derived subseed");
    Ok(trits)
}

/// Derive the private key for `index` at the given security level.
pub fn key(seed: &[Trit], index: u64, security: SecurityLevel) -> SigningResult<PrivateKey> {
    let subseed = subseed(seed, index)?;
    let key = key_from_subseed(&subseed, security)?;
    debug!(index, %security, "derived private key");
    Ok(key)
}

/// Expand a subseed into `security × 27` Kerl squeezes of 243 trits.
pub fn key_from_subseed(subseed: &[Trit], security: SecurityLevel) -> SigningResult<PrivateKey> {
    let mut kerl = Kerl::new();
    kerl.absorb(subseed, 0, subseed.len())?;

    let mut trits = vec![0; security.key_length()];
    for offset in (0..trits.len()).step_by(HASH_LENGTH) {
        kerl.squeeze(&mut trits, offset, HASH_LENGTH)?;
    }
    debug_assert_eq!(trits.len(), security.fragments() * CHUNKS_PER_FRAGMENT * HASH_LENGTH);

    Ok(PrivateKey { trits, security })
}
