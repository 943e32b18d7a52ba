use sha3::{Digest, Keccak384};
use tern_types::Trit;

use crate::sponge::{check_bounds, Sponge, SpongeError, SpongeResult};
use crate::words::{bytes_to_trits, trits_to_bytes, BYTE_LENGTH};
use crate::HASH_LENGTH;

/// Ternary sponge backed by Keccak-384.
///
/// Every 243-trit chunk is converted to a 48-byte word before it reaches the
/// hasher, with its last trit forced to zero. Squeezing finalizes a copy of
/// the hasher, restarts it, and feeds it the bitwise complement of the
/// emitted digest so consecutive chunks differ.
#[derive(Clone)]
pub struct Kerl {
    keccak: Keccak384,
}

impl Kerl {
    pub fn new() -> Self {
        Self {
            keccak: Keccak384::new(),
        }
    }
}

impl Default for Kerl {
    fn default() -> Self {
        Self::new()
    }
}

fn check_chunked(len: usize, offset: usize, length: usize) -> SpongeResult<()> {
    if length % HASH_LENGTH != 0 {
        return Err(SpongeError::IllegalLength(length));
    }
    check_bounds(len, offset, length)
}

impl Sponge for Kerl {
    fn reset(&mut self) {
        Digest::reset(&mut self.keccak);
    }

    fn absorb(&mut self, trits: &[Trit], offset: usize, length: usize) -> SpongeResult<()> {
        check_chunked(trits.len(), offset, length)?;

        let mut chunk = [0; HASH_LENGTH];
        for start in (offset..offset + length).step_by(HASH_LENGTH) {
            chunk.copy_from_slice(&trits[start..start + HASH_LENGTH]);
            chunk[HASH_LENGTH - 1] = 0;
            self.keccak.update(trits_to_bytes(&chunk));
        }
        Ok(())
    }

    fn squeeze(&mut self, trits: &mut [Trit], offset: usize, length: usize) -> SpongeResult<()> {
        check_chunked(trits.len(), offset, length)?;

        for start in (offset..offset + length).step_by(HASH_LENGTH) {
            let mut digest = [0u8; BYTE_LENGTH];
            digest.copy_from_slice(&self.keccak.clone().finalize());
            trits[start..start + HASH_LENGTH].copy_from_slice(&bytes_to_trits(&digest));

            self.keccak = Keccak384::new();
            self.keccak.update(digest.map(|b| !b));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Kerl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Kerl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_types::{trits, trytes};

    fn run(input: &str, out_len: usize) -> String {
        let input = trits(input).unwrap();
        let mut kerl = Kerl::new();
        kerl.absorb(&input, 0, input.len()).unwrap();
        let mut out = vec![0; out_len];
        kerl.squeeze(&mut out, 0, out_len).unwrap();
        trytes(&out)
    }

    #[test]
    fn single_chunk_vector() {
        assert_eq!(
            run(
                "GYOMKVTSNHVJNCNFBBAH9AAMXLPLLLROQY99QN9DLSJUHDPBLCFFAIQXZA9BKMBJCYSFHFPXAHDWZFEIZ",
                243
            ),
            "OXJCNFHUNAHWDLKKPELTBFUCVW9KLXKOGWERKTJXQMXTKFKNWNNXYD9DMJJABSEIONOSJTTEVKVDQEWTW"
        );
    }

    #[test]
    fn multi_chunk_squeeze_vector() {
        assert_eq!(
            run(
                "9MIDYNHBWMBCXVDEFOFWINXTERALUKYYPPHKP9JJFGJEIUY9MUDVNFZHMMWZUYUSWAIOWEVTHNWMHANBH",
                486
            ),
            "G9JYBOMPUXHYHKSNRNMMSSZCSHOFYOYNZRSZMAAYWDYEIMVVOGKPJBVBM9TDPULSFUNMTVXRKFIDOHUXXVYDLFSZYZTWQYTE9SPYYWYTXJYQ9IFGYOLZXWZBKWZN9QOOTBQMWMUBLEWUEEASRHRTNIQWJQNDWRYLCA"
        );
    }

    #[test]
    fn rejects_partial_chunks() {
        let mut kerl = Kerl::new();
        let buf = vec![0; 486];
        assert_eq!(
            kerl.absorb(&buf, 0, 242).unwrap_err(),
            SpongeError::IllegalLength(242)
        );
        let mut out = vec![0; 486];
        assert_eq!(
            kerl.squeeze(&mut out, 0, 100).unwrap_err(),
            SpongeError::IllegalLength(100)
        );
    }

    #[test]
    fn chunked_squeeze_matches_single_call() {
        let input = vec![1; HASH_LENGTH];
        let mut a = Kerl::new();
        a.absorb(&input, 0, HASH_LENGTH).unwrap();
        let mut long = vec![0; 3 * HASH_LENGTH];
        a.squeeze(&mut long, 0, 3 * HASH_LENGTH).unwrap();

        let mut b = Kerl::new();
        b.absorb(&input, 0, HASH_LENGTH).unwrap();
        let mut chunked = vec![0; 3 * HASH_LENGTH];
        for i in 0..3 {
            b.squeeze(&mut chunked, i * HASH_LENGTH, HASH_LENGTH).unwrap();
        }
        assert_eq!(long, chunked);
    }

    #[test]
    fn output_last_trit_is_zero() {
        let out = Kerl::new().hash(&[-1; HASH_LENGTH]).unwrap();
        assert_eq!(out[HASH_LENGTH - 1], 0);
    }

    #[test]
    fn last_input_trit_does_not_matter() {
        let mut a = vec![1; HASH_LENGTH];
        let mut b = a.clone();
        a[HASH_LENGTH - 1] = -1;
        b[HASH_LENGTH - 1] = 1;
        assert_eq!(Kerl::new().hash(&a).unwrap(), Kerl::new().hash(&b).unwrap());
    }

    #[test]
    fn clones_evolve_independently() {
        let mut kerl = Kerl::new();
        kerl.absorb(&[1; HASH_LENGTH], 0, HASH_LENGTH).unwrap();
        let mut copy = kerl.clone();

        let mut a = vec![0; HASH_LENGTH];
        kerl.squeeze(&mut a, 0, HASH_LENGTH).unwrap();
        let mut b = vec![0; HASH_LENGTH];
        copy.squeeze(&mut b, 0, HASH_LENGTH).unwrap();
        assert_eq!(a, b);

        kerl.squeeze(&mut a, 0, HASH_LENGTH).unwrap();
        assert_ne!(a, b);
    }
}
