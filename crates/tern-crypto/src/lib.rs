//! Ternary sponge primitives.
//!
//! Two hash functions share the [`Sponge`] interface:
//!
//! - [`Curl`]: the native ternary permutation over a 729-trit state, used
//!   for general hashing such as transaction hashes.
//! - [`Kerl`]: a Keccak-384 adapter that emulates a ternary sponge, used
//!   for the security-critical paths (key derivation, signatures, bundle
//!   hashes).
//!
//! [`SpongeKind`] picks one at runtime.

pub mod curl;
pub mod kerl;
pub mod sponge;
pub mod words;

pub use curl::Curl;
pub use kerl::Kerl;
pub use sponge::{Sponge, SpongeError, SpongeKind, SpongeResult};

/// Length of a hash in trits.
pub const HASH_LENGTH: usize = 243;

/// Length of the Curl state in trits.
pub const STATE_LENGTH: usize = 3 * HASH_LENGTH;
