use tern_crypto::HASH_LENGTH;
use tern_types::{trits, trytes, Trit};
use tracing::debug;

use crate::digest::{address, check_fragment, digest, hash_chain};
use crate::error::{SigningError, SigningResult};
use crate::normalize::normalized_bundle_hash;
use crate::{CHUNKS_PER_FRAGMENT, MAX_NORMALIZED_VALUE};

/// Sign one normalized fragment with one key fragment: chunk `i` is hashed
/// `13 - normalized[i]` times.
pub fn signature_fragment(normalized: &[i8], key_fragment: &[Trit]) -> SigningResult<Vec<Trit>> {
    check_fragment(normalized, key_fragment)?;

    let mut signature = key_fragment.to_vec();
    for (chunk, &v) in signature.chunks_exact_mut(HASH_LENGTH).zip(normalized) {
        let links = (MAX_NORMALIZED_VALUE as i16 - i16::from(v)).max(0) as usize;
        hash_chain(chunk, links)?;
    }
    Ok(signature)
}

/// Check that `signature_fragments` (trytes) were produced by the key behind
/// `expected_address` for `bundle_hash`.
///
/// Fragment `i` is verified against normalized fragment `i % 3`.
pub fn validate_signatures<S: AsRef<str>>(
    expected_address: &str,
    signature_fragments: &[S],
    bundle_hash: &str,
) -> SigningResult<bool> {
    if bundle_hash.is_empty() {
        return Err(SigningError::InvalidBundleHash(String::new()));
    }

    let normalized = normalized_bundle_hash(bundle_hash)?;
    let fragments: Vec<&[i8]> = normalized.chunks_exact(CHUNKS_PER_FRAGMENT).collect();

    let mut digests = Vec::with_capacity(signature_fragments.len() * HASH_LENGTH);
    for (i, fragment) in signature_fragments.iter().enumerate() {
        let fragment = trits(fragment.as_ref())?;
        digests.extend(digest(fragments[i % fragments.len()], &fragment)?);
    }

    let actual = trytes(&address(&digests)?);
    let valid = actual == expected_address;
    debug!(
        fragments = signature_fragments.len(),
        valid, "validated signature fragments"
    );
    Ok(valid)
}
