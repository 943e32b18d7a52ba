use std::ops::Range;

use tern_crypto::{Kerl, Sponge, HASH_LENGTH};
use tern_signing::{is_insecure, normalized_bundle_hash};
use tern_types::{add, pad_trytes, trits, trytes, Trit, TRYTE_WIDTH};
use tracing::{debug, warn};

use crate::codec::essence_trytes;
use crate::config::BundleConfig;
use crate::entry::BundleEntry;
use crate::error::{BundleError, BundleResult};
use crate::transaction::{
    null_hash, Transaction, NONCE_LENGTH_TRYTES, SIGNATURE_MESSAGE_FRAGMENT_LENGTH,
};

/// Obsolete tag trits within one transaction's essence, after the address
/// and the value.
const OBSOLETE_TAG_TRITS: Range<usize> = (81 + 27) * TRYTE_WIDTH..(81 + 54) * TRYTE_WIDTH;

/// Build a bundle from entries, in order.
pub fn create_bundle(entries: &[BundleEntry]) -> Vec<Transaction> {
    entries
        .iter()
        .fold(Vec::new(), |transactions, entry| add_entry(transactions, entry))
}

/// Append the transactions for one entry.
///
/// Every existing transaction's `last_index` is moved to the new end. Only
/// the first new transaction carries the entry's value; the rest hold the
/// remaining signature fragments.
pub fn add_entry(mut transactions: Vec<Transaction>, entry: &BundleEntry) -> Vec<Transaction> {
    let entry = entry.with_defaults();
    let start = transactions.len();
    let last_index = start + entry.length - 1;

    for tx in &mut transactions {
        tx.last_index = last_index;
    }

    for (i, fragment) in entry.signature_message_fragments.into_iter().enumerate() {
        transactions.push(Transaction {
            hash: null_hash(),
            signature_message_fragment: fragment,
            address: entry.address.clone(),
            value: if i == 0 { entry.value } else { 0 },
            obsolete_tag: entry.tag.clone(),
            timestamp: entry.timestamp,
            current_index: start + i,
            last_index,
            bundle: null_hash(),
            trunk_transaction: null_hash(),
            branch_transaction: null_hash(),
            tag: entry.tag.clone(),
            attachment_timestamp: 0,
            attachment_timestamp_lower_bound: 0,
            attachment_timestamp_upper_bound: 0,
            nonce: pad_trytes("", NONCE_LENGTH_TRYTES),
        });
    }

    debug!(
        address = %entry.address,
        value = entry.value,
        count = entry.length,
        total = transactions.len(),
        "added bundle entry"
    );
    transactions
}

/// Write signature or message fragments into transactions
/// `offset..offset + fragments.len()`, padding each to 2187 trytes.
pub fn add_trytes<S: AsRef<str>>(
    mut transactions: Vec<Transaction>,
    fragments: &[S],
    offset: usize,
) -> BundleResult<Vec<Transaction>> {
    let checked_end = offset.checked_add(fragments.len());
    let Some(end) = checked_end.filter(|&end| end <= transactions.len()) else {
        return Err(BundleError::FragmentOutOfRange {
            offset,
            end: checked_end.unwrap_or(usize::MAX),
            len: transactions.len(),
        });
    };

    for (tx, fragment) in transactions[offset..end].iter_mut().zip(fragments) {
        tx.signature_message_fragment =
            pad_trytes(fragment.as_ref(), SIGNATURE_MESSAGE_FRAGMENT_LENGTH);
    }
    Ok(transactions)
}

/// Compute and stamp the bundle hash with the default [`BundleConfig`].
pub fn finalize_bundle(transactions: Vec<Transaction>) -> BundleResult<Vec<Transaction>> {
    finalize_bundle_with(transactions, &BundleConfig::default())
}

/// Compute and stamp the bundle hash.
///
/// The hash covers every transaction's essence, all sharing the first
/// transaction's `last_index`. While the normalized hash contains a 13 the
/// first transaction's obsolete tag is incremented and the hash recomputed.
pub fn finalize_bundle_with(
    mut transactions: Vec<Transaction>,
    config: &BundleConfig,
) -> BundleResult<Vec<Transaction>> {
    let last_index = transactions
        .first()
        .map(|tx| tx.last_index)
        .ok_or(BundleError::EmptyBundle)?;

    let mut essences = transactions
        .iter()
        .map(|tx| -> BundleResult<Vec<Trit>> {
            Ok(trits(essence_trytes(tx, last_index)?.as_str())?)
        })
        .collect::<BundleResult<Vec<_>>>()?;

    for attempt in 1..=config.max_finalize_attempts {
        let mut kerl = Kerl::new();
        for essence in &essences {
            kerl.absorb(essence, 0, essence.len())?;
        }
        let mut hash = [0; HASH_LENGTH];
        kerl.squeeze(&mut hash, 0, HASH_LENGTH)?;
        let bundle_hash = trytes(&hash);

        if !is_insecure(&normalized_bundle_hash(&bundle_hash)?) {
            transactions[0].obsolete_tag = trytes(&essences[0][OBSOLETE_TAG_TRITS]);
            for tx in &mut transactions {
                tx.bundle.clone_from(&bundle_hash);
            }
            debug!(bundle = %bundle_hash, attempts = attempt, "bundle finalized");
            return Ok(transactions);
        }

        let tag = &mut essences[0][OBSOLETE_TAG_TRITS];
        let bumped = add(tag, &[1]);
        tag.copy_from_slice(&bumped);
    }

    warn!(
        attempts = config.max_finalize_attempts,
        "no secure bundle hash found"
    );
    Err(BundleError::BundleHashSecurityRetryExceeded {
        attempts: config.max_finalize_attempts,
    })
}
