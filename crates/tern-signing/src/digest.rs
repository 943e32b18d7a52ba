use tern_crypto::{Kerl, Sponge, HASH_LENGTH};
use tern_types::Trit;

use crate::error::{SigningError, SigningResult};
use crate::{CHUNKS_PER_FRAGMENT, KEY_FRAGMENT_LENGTH, MAX_NORMALIZED_VALUE};

/// Hash a 243-trit chunk `times` times, restarting Kerl for every link.
pub(crate) fn hash_chain(chunk: &mut [Trit], times: usize) -> SigningResult<()> {
    let mut kerl = Kerl::new();
    for _ in 0..times {
        kerl.reset();
        kerl.absorb(chunk, 0, HASH_LENGTH)?;
        kerl.squeeze(chunk, 0, HASH_LENGTH)?;
    }
    Ok(())
}

pub(crate) fn check_fragment(normalized: &[i8], fragment: &[Trit]) -> SigningResult<()> {
    if normalized.len() != CHUNKS_PER_FRAGMENT {
        return Err(SigningError::IllegalFragmentLength {
            expected: CHUNKS_PER_FRAGMENT,
            actual: normalized.len(),
        });
    }
    if fragment.len() != KEY_FRAGMENT_LENGTH {
        return Err(SigningError::IllegalFragmentLength {
            expected: KEY_FRAGMENT_LENGTH,
            actual: fragment.len(),
        });
    }
    Ok(())
}

/// Public digests of a private key, 243 trits per key fragment.
///
/// Each of the 27 chunks of a fragment is hashed to the top of its chain
/// (26 links) and the chain tops are hashed together.
pub fn digests(key: &[Trit]) -> SigningResult<Vec<Trit>> {
    if key.is_empty() || key.len() % KEY_FRAGMENT_LENGTH != 0 {
        return Err(SigningError::IllegalKeyLength(key.len()));
    }

    let mut out = Vec::with_capacity(key.len() / KEY_FRAGMENT_LENGTH * HASH_LENGTH);
    for fragment in key.chunks_exact(KEY_FRAGMENT_LENGTH) {
        let mut tops = fragment.to_vec();
        for chunk in tops.chunks_exact_mut(HASH_LENGTH) {
            hash_chain(chunk, 2 * MAX_NORMALIZED_VALUE)?;
        }

        let mut kerl = Kerl::new();
        kerl.absorb(&tops, 0, tops.len())?;
        let mut digest = [0; HASH_LENGTH];
        kerl.squeeze(&mut digest, 0, HASH_LENGTH)?;
        out.extend_from_slice(&digest);
    }
    Ok(out)
}

/// Address for a set of digests.
pub fn address(digests: &[Trit]) -> SigningResult<Vec<Trit>> {
    let mut kerl = Kerl::new();
    Ok(kerl.hash(digests)?)
}

/// Recover the level digest from a signature fragment by finishing each
/// chain: chunk `i` gets `normalized[i] + 13` more links.
pub fn digest(normalized: &[i8], signature_fragment: &[Trit]) -> SigningResult<Vec<Trit>> {
    check_fragment(normalized, signature_fragment)?;

    let mut kerl = Kerl::new();
    let mut buffer = [0; HASH_LENGTH];
    for (chunk, &v) in signature_fragment.chunks_exact(HASH_LENGTH).zip(normalized) {
        buffer.copy_from_slice(chunk);
        hash_chain(&mut buffer, remaining_links(v))?;
        kerl.absorb(&buffer, 0, HASH_LENGTH)?;
    }

    kerl.squeeze(&mut buffer, 0, HASH_LENGTH)?;
    Ok(buffer.to_vec())
}

fn remaining_links(v: i8) -> usize {
    (i16::from(v) + MAX_NORMALIZED_VALUE as i16).clamp(0, 2 * MAX_NORMALIZED_VALUE as i16) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{key, SecurityLevel};
    use tern_types::trits;

    fn seed() -> Vec<Trit> {
        trits("SEED99TESTING99DIGESTS99AND99ADDRESSES99SEED99TESTING99DIGESTS99AND99ADDRESSES999").unwrap()
    }

    #[test]
    fn one_digest_per_fragment() {
        let key = key(&seed(), 0, SecurityLevel::Medium).unwrap();
        let digests = digests(key.as_trits()).unwrap();
        assert_eq!(digests.len(), 2 * HASH_LENGTH);
    }

    #[test]
    fn digests_reject_partial_keys() {
        assert_eq!(
            digests(&[0; 100]).unwrap_err(),
            SigningError::IllegalKeyLength(100)
        );
        assert_eq!(digests(&[]).unwrap_err(), SigningError::IllegalKeyLength(0));
    }

    #[test]
    fn fragment_digests_are_independent() {
        let low = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let high = key(&seed(), 0, SecurityLevel::High).unwrap();
        let low_digests = digests(low.as_trits()).unwrap();
        let high_digests = digests(high.as_trits()).unwrap();
        assert_eq!(low_digests, high_digests[..HASH_LENGTH]);
    }

    #[test]
    fn address_depends_on_security_level() {
        let low = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let medium = key(&seed(), 0, SecurityLevel::Medium).unwrap();
        let a = address(&digests(low.as_trits()).unwrap()).unwrap();
        let b = address(&digests(medium.as_trits()).unwrap()).unwrap();
        assert_eq!(a.len(), HASH_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn digest_at_maximum_matches_key_digest() {
        // A fragment of all 13s signs with zero links, so the signature is
        // the key fragment itself and finishing the chains gives the digest.
        let key = key(&seed(), 2, SecurityLevel::Low).unwrap();
        let normalized = [13i8; 27];
        let recovered = digest(&normalized, key.as_trits()).unwrap();
        assert_eq!(recovered, digests(key.as_trits()).unwrap());
    }

    #[test]
    fn digest_checks_lengths() {
        assert_eq!(
            digest(&[0; 26], &[0; 6561]).unwrap_err(),
            SigningError::IllegalFragmentLength {
                expected: 27,
                actual: 26
            }
        );
        assert_eq!(
            digest(&[0; 27], &[0; 243]).unwrap_err(),
            SigningError::IllegalFragmentLength {
                expected: 6561,
                actual: 243
            }
        );
    }

    #[test]
    fn chain_composes() {
        let mut once = [1; HASH_LENGTH];
        hash_chain(&mut once, 3).unwrap();
        let mut split = [1; HASH_LENGTH];
        hash_chain(&mut split, 1).unwrap();
        hash_chain(&mut split, 2).unwrap();
        assert_eq!(once, split);

        let mut untouched = [1; HASH_LENGTH];
        hash_chain(&mut untouched, 0).unwrap();
        assert_eq!(untouched, [1; HASH_LENGTH]);
    }
}
