use tern_types::tryte_value;

use crate::error::{SigningError, SigningResult};
use crate::{CHUNKS_PER_FRAGMENT, MAX_NORMALIZED_VALUE, NORMALIZED_LENGTH};

const MAX: i8 = MAX_NORMALIZED_VALUE as i8;

/// Normalize an 81-tryte bundle hash into three 27-value fragments whose
/// values each sum to zero.
///
/// Positive sums are worked off by decrementing the first value above -13,
/// one unit per pass; negative sums by incrementing the first value below 13.
/// A 13 in the result means the matching key chunk would be revealed
/// unhashed.
pub fn normalized_bundle_hash(bundle_hash: &str) -> SigningResult<[i8; NORMALIZED_LENGTH]> {
    let mut normalized = [0i8; NORMALIZED_LENGTH];
    if bundle_hash.len() != NORMALIZED_LENGTH {
        return Err(SigningError::InvalidBundleHash(bundle_hash.to_owned()));
    }
    for (slot, c) in normalized.iter_mut().zip(bundle_hash.chars()) {
        *slot = tryte_value(c).ok_or_else(|| SigningError::InvalidBundleHash(bundle_hash.to_owned()))?;
    }

    for fragment in normalized.chunks_exact_mut(CHUNKS_PER_FRAGMENT) {
        let mut sum: i32 = fragment.iter().map(|&v| i32::from(v)).sum();

        while sum > 0 {
            if let Some(v) = fragment.iter_mut().find(|v| **v > -MAX) {
                *v -= 1;
            }
            sum -= 1;
        }
        while sum < 0 {
            if let Some(v) = fragment.iter_mut().find(|v| **v < MAX) {
                *v += 1;
            }
            sum += 1;
        }
    }

    Ok(normalized)
}

/// Whether a normalized hash would expose an unhashed key chunk.
pub fn is_insecure(normalized: &[i8]) -> bool {
    normalized.contains(&MAX)
}
