//! Conversion between 243-trit hashes and 384-bit Keccak words.
//!
//! The first 242 trits are read as a balanced-ternary integer and encoded as
//! a 48-byte big-endian two's-complement number; the last trit is always 0.
//! Decoding reduces the signed 384-bit integer modulo `3^242` into the
//! balanced range before expanding it back to trits.

use std::sync::LazyLock;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::Signed;
use tern_types::Trit;

use crate::HASH_LENGTH;

/// Length of a Keccak-384 digest in bytes.
pub const BYTE_LENGTH: usize = 48;

const DIGITS: usize = HASH_LENGTH - 1;

static THREE_POW_242: LazyLock<BigInt> = LazyLock::new(|| BigInt::from(3u8).pow(DIGITS as u32));

/// `(3^242 - 1) / 2`, the largest value 242 balanced trits can hold.
static HALF_3: LazyLock<BigInt> = LazyLock::new(|| (&*THREE_POW_242 - 1u8) / 2u8);

/// Encode a hash as 48 big-endian two's-complement bytes. Trit 242 is ignored.
pub fn trits_to_bytes(trits: &[Trit; HASH_LENGTH]) -> [u8; BYTE_LENGTH] {
    let digits: Vec<u8> = trits[..DIGITS]
        .iter()
        .map(|&t| (t.clamp(-1, 1) + 1) as u8)
        .collect();
    // Every digit is in 0..3, so the radix parse cannot fail.
    let unsigned = BigUint::from_radix_le(&digits, 3).unwrap_or_default();
    let signed = BigInt::from(unsigned) - &*HALF_3;

    let raw = signed.to_signed_bytes_be();
    let fill = if signed.is_negative() { 0xff } else { 0x00 };
    let mut out = [fill; BYTE_LENGTH];
    out[BYTE_LENGTH - raw.len()..].copy_from_slice(&raw);
    out
}

/// Decode 48 big-endian two's-complement bytes into a hash.
pub fn bytes_to_trits(bytes: &[u8; BYTE_LENGTH]) -> [Trit; HASH_LENGTH] {
    let signed = BigInt::from_signed_bytes_be(bytes);
    let shifted = (signed + &*HALF_3).mod_floor(&*THREE_POW_242);

    let mut out = [-1; HASH_LENGTH];
    for (slot, digit) in out.iter_mut().zip(shifted.magnitude().to_radix_le(3)) {
        *slot = digit as Trit - 1;
    }
    out[HASH_LENGTH - 1] = 0;
    out
}
