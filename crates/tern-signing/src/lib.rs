//! Winternitz one-time signatures over Kerl.
//!
//! A seed and an index give a subseed, the subseed expands into a private key
//! of one to three 6561-trit fragments, and each fragment hashes down to a
//! 243-trit digest. The digests hash into an address. Signing a bundle hash
//! reveals every key chunk part-way up its hash chain; verification finishes
//! the chains and compares the resulting address.
//!
//! # Key Types
//!
//! - [`SecurityLevel`] — number of key fragments (1, 2 or 3)
//! - [`PrivateKey`] — key trits, wiped on drop
//! - [`SigningError`] — derivation and verification failures
//!
//! Keys are one-time: signing two different bundle hashes with the same key
//! leaks enough chain positions to forge further signatures.

pub mod digest;
pub mod error;
pub mod key;
pub mod normalize;
pub mod signature;

pub use digest::{address, digest, digests};
pub use error::{SigningError, SigningResult};
pub use key::{key, key_from_subseed, subseed, PrivateKey, SecurityLevel};
pub use normalize::{is_insecure, normalized_bundle_hash};
pub use signature::{signature_fragment, validate_signatures};

/// Trits in one key fragment (and one signature fragment).
pub const KEY_FRAGMENT_LENGTH: usize = 6561;

/// 243-trit chunks per key fragment.
pub const CHUNKS_PER_FRAGMENT: usize = 27;

/// Values in a normalized bundle hash.
pub const NORMALIZED_LENGTH: usize = 81;

/// Largest normalized value. Signing hashes a chunk `13 - v` times.
pub const MAX_NORMALIZED_VALUE: usize = 13;
