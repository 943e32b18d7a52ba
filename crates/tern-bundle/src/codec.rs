//! The 2673-tryte transaction wire format.
//!
//! | field                            | trytes       |
//! |----------------------------------|--------------|
//! | signature / message fragment     | 0..2187      |
//! | address                          | 2187..2268   |
//! | value                            | 2268..2295   |
//! | obsolete tag                     | 2295..2322   |
//! | timestamp                        | 2322..2331   |
//! | current index                    | 2331..2340   |
//! | last index                       | 2340..2349   |
//! | bundle                           | 2349..2430   |
//! | trunk transaction                | 2430..2511   |
//! | branch transaction               | 2511..2592   |
//! | tag                              | 2592..2619   |
//! | attachment timestamp             | 2619..2628   |
//! | attachment lower bound           | 2628..2637   |
//! | attachment upper bound           | 2637..2646   |
//! | nonce                            | 2646..2673   |
//!
//! Trytes `2187..2349` form the bundle essence that the bundle hash commits
//! to.

use std::ops::Range;

use num_bigint::BigInt;
use tern_crypto::{Curl, Sponge};
use tern_types::{
    from_value, is_trytes, is_trytes_of_length, pad_trits, pad_trytes, trits, trytes, value_i64,
    ConvertError, Trit, TRYTE_WIDTH,
};

use crate::error::{BundleError, BundleResult};
use crate::transaction::Transaction;

/// Trytes in a serialized transaction.
pub const TRANSACTION_LENGTH: usize = 2673;

/// Trits in a serialized transaction.
pub const TRANSACTION_LENGTH_TRITS: usize = TRANSACTION_LENGTH * TRYTE_WIDTH;

/// Tryte range of the bundle essence.
pub const ESSENCE_RANGE: Range<usize> = 2187..2349;

/// Low value trits that may be non-zero on the wire; the rest of the value
/// field is reserved and must stay `9`. The essence uses the full field.
const VALUE_USABLE_TRITS: usize = 33;

#[derive(Clone, Copy)]
struct Field {
    name: &'static str,
    offset: usize,
    length: usize,
}

impl Field {
    const fn new(name: &'static str, offset: usize, length: usize) -> Self {
        Self { name, offset, length }
    }

    fn range(self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    fn trit_range(self) -> Range<usize> {
        self.offset * TRYTE_WIDTH..(self.offset + self.length) * TRYTE_WIDTH
    }

    fn invalid(self, reason: impl Into<String>) -> BundleError {
        BundleError::InvalidField {
            field: self.name,
            reason: reason.into(),
        }
    }
}

const SIGNATURE: Field = Field::new("signatureMessageFragment", 0, 2187);
const ADDRESS: Field = Field::new("address", 2187, 81);
const VALUE: Field = Field::new("value", 2268, 27);
const OBSOLETE_TAG: Field = Field::new("obsoleteTag", 2295, 27);
const TIMESTAMP: Field = Field::new("timestamp", 2322, 9);
const CURRENT_INDEX: Field = Field::new("currentIndex", 2331, 9);
const LAST_INDEX: Field = Field::new("lastIndex", 2340, 9);
const BUNDLE: Field = Field::new("bundle", 2349, 81);
const TRUNK: Field = Field::new("trunkTransaction", 2430, 81);
const BRANCH: Field = Field::new("branchTransaction", 2511, 81);
const TAG: Field = Field::new("tag", 2592, 27);
const ATTACHMENT_TIMESTAMP: Field = Field::new("attachmentTimestamp", 2619, 9);
const ATTACHMENT_LOWER_BOUND: Field = Field::new("attachmentTimestampLowerBound", 2628, 9);
const ATTACHMENT_UPPER_BOUND: Field = Field::new("attachmentTimestampUpperBound", 2637, 9);
const NONCE: Field = Field::new("nonce", 2646, 27);

fn push_exact(out: &mut String, field: Field, value: &str) -> BundleResult<()> {
    if !is_trytes_of_length(value, field.length) {
        return Err(field.invalid(format!("expected {} trytes", field.length)));
    }
    out.push_str(value);
    Ok(())
}

fn push_padded(out: &mut String, field: Field, value: &str) -> BundleResult<()> {
    if !is_trytes(value) || value.len() > field.length {
        return Err(field.invalid(format!("expected at most {} trytes", field.length)));
    }
    out.push_str(&pad_trytes(value, field.length));
    Ok(())
}

fn push_number(
    out: &mut String,
    field: Field,
    value: impl Into<BigInt>,
    max_trits: usize,
) -> BundleResult<()> {
    let encoded = from_value(value);
    if encoded.len() > max_trits {
        return Err(field.invalid(format!("does not fit in {max_trits} trits")));
    }
    out.push_str(&trytes(&pad_trits(&encoded, field.length * TRYTE_WIDTH)));
    Ok(())
}

/// Essence trytes of `tx` with the given shared last index.
pub(crate) fn essence_trytes(tx: &Transaction, last_index: usize) -> BundleResult<String> {
    let mut out = String::with_capacity(ESSENCE_RANGE.len());
    push_exact(&mut out, ADDRESS, &tx.address)?;
    push_number(&mut out, VALUE, tx.value, VALUE.length * TRYTE_WIDTH)?;
    push_padded(&mut out, OBSOLETE_TAG, &tx.obsolete_tag)?;
    push_number(&mut out, TIMESTAMP, tx.timestamp, TIMESTAMP.length * TRYTE_WIDTH)?;
    push_number(&mut out, CURRENT_INDEX, tx.current_index, CURRENT_INDEX.length * TRYTE_WIDTH)?;
    push_number(&mut out, LAST_INDEX, last_index, LAST_INDEX.length * TRYTE_WIDTH)?;
    Ok(out)
}

/// Serialize a transaction into its 2673 trytes.
///
/// Hash-sized fields and the signature fragment must have their exact
/// length; tags and the nonce are padded with `9`. An empty tag falls back
/// to the obsolete tag.
pub fn as_transaction_trytes(tx: &Transaction) -> BundleResult<String> {
    if from_value(tx.value).len() > VALUE_USABLE_TRITS {
        return Err(VALUE.invalid(format!("does not fit in {VALUE_USABLE_TRITS} trits")));
    }
    let mut out = String::with_capacity(TRANSACTION_LENGTH);
    push_exact(&mut out, SIGNATURE, &tx.signature_message_fragment)?;
    out.push_str(&essence_trytes(tx, tx.last_index)?);
    push_exact(&mut out, BUNDLE, &tx.bundle)?;
    push_exact(&mut out, TRUNK, &tx.trunk_transaction)?;
    push_exact(&mut out, BRANCH, &tx.branch_transaction)?;
    let tag = if tx.tag.is_empty() {
        &tx.obsolete_tag
    } else {
        &tx.tag
    };
    push_padded(&mut out, TAG, tag)?;
    for (field, value) in [
        (ATTACHMENT_TIMESTAMP, tx.attachment_timestamp),
        (ATTACHMENT_LOWER_BOUND, tx.attachment_timestamp_lower_bound),
        (ATTACHMENT_UPPER_BOUND, tx.attachment_timestamp_upper_bound),
    ] {
        push_number(&mut out, field, value, field.length * TRYTE_WIDTH)?;
    }
    push_padded(&mut out, NONCE, &tx.nonce)?;

    debug_assert_eq!(out.len(), TRANSACTION_LENGTH);
    Ok(out)
}

fn number(trits: &[Trit], field: Field) -> BundleResult<i64> {
    value_i64(&trits[field.trit_range()]).map_err(|e| field.invalid(e.to_string()))
}

fn unsigned<T: TryFrom<i64>>(trits: &[Trit], field: Field) -> BundleResult<T> {
    let n = number(trits, field)?;
    T::try_from(n).map_err(|_| field.invalid(format!("{n} is out of range")))
}

/// Parse 2673 transaction trytes.
///
/// The reserved upper value trytes (2279..2295) must all be `9`. When `hash`
/// is `None` the transaction hash is recomputed with Curl.
pub fn as_transaction_object(tx_trytes: &str, hash: Option<&str>) -> BundleResult<Transaction> {
    if !is_trytes_of_length(tx_trytes, TRANSACTION_LENGTH) {
        return Err(BundleError::InvalidTrytes(format!(
            "expected {TRANSACTION_LENGTH} trytes, got {}",
            tx_trytes.len()
        )));
    }
    let reserved = VALUE.offset + VALUE_USABLE_TRITS / TRYTE_WIDTH..VALUE.offset + VALUE.length;
    if tx_trytes[reserved].bytes().any(|b| b != b'9') {
        return Err(BundleError::InvalidTrytes(
            "reserved value trytes are not empty".into(),
        ));
    }

    let tx_trits = trits(tx_trytes)?;
    let hash = match hash {
        Some(h) => h.to_owned(),
        None => trytes(&transaction_hash(&tx_trits)?),
    };
    let slice = |field: Field| tx_trytes[field.range()].to_owned();

    Ok(Transaction {
        hash,
        signature_message_fragment: slice(SIGNATURE),
        address: slice(ADDRESS),
        value: number(&tx_trits, VALUE)?,
        obsolete_tag: slice(OBSOLETE_TAG),
        timestamp: unsigned(&tx_trits, TIMESTAMP)?,
        current_index: unsigned(&tx_trits, CURRENT_INDEX)?,
        last_index: unsigned(&tx_trits, LAST_INDEX)?,
        bundle: slice(BUNDLE),
        trunk_transaction: slice(TRUNK),
        branch_transaction: slice(BRANCH),
        tag: slice(TAG),
        attachment_timestamp: number(&tx_trits, ATTACHMENT_TIMESTAMP)?,
        attachment_timestamp_lower_bound: number(&tx_trits, ATTACHMENT_LOWER_BOUND)?,
        attachment_timestamp_upper_bound: number(&tx_trits, ATTACHMENT_UPPER_BOUND)?,
        nonce: slice(NONCE),
    })
}

/// Curl-81 hash of 8019 transaction trits.
pub fn transaction_hash(tx_trits: &[Trit]) -> BundleResult<Vec<Trit>> {
    if tx_trits.len() != TRANSACTION_LENGTH_TRITS {
        return Err(ConvertError::InvalidLength {
            expected: TRANSACTION_LENGTH_TRITS,
            actual: tx_trits.len(),
        }
        .into());
    }
    Ok(Curl::default().hash(tx_trits)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::create_bundle;
    use crate::entry::BundleEntry;
    use proptest::prelude::*;

    fn sample() -> Transaction {
        let entry = BundleEntry::transfer("A".repeat(81), -1_000_000)
            .with_tag("CODEC")
            .with_timestamp(1_522_219);
        let mut tx = create_bundle(&[entry]).remove(0);
        tx.attachment_timestamp = 1_600_000_000_000;
        tx.attachment_timestamp_upper_bound = 3_812_798_742_493;
        tx.signature_message_fragment = "ABC".repeat(729);
        tx
    }

    #[test]
    fn layout_is_contiguous() {
        let fields = [
            SIGNATURE,
            ADDRESS,
            VALUE,
            OBSOLETE_TAG,
            TIMESTAMP,
            CURRENT_INDEX,
            LAST_INDEX,
            BUNDLE,
            TRUNK,
            BRANCH,
            TAG,
            ATTACHMENT_TIMESTAMP,
            ATTACHMENT_LOWER_BOUND,
            ATTACHMENT_UPPER_BOUND,
            NONCE,
        ];
        let mut next = 0;
        for field in fields {
            assert_eq!(field.offset, next, "{}", field.name);
            next += field.length;
        }
        assert_eq!(next, TRANSACTION_LENGTH);
        assert_eq!(ESSENCE_RANGE, ADDRESS.offset..LAST_INDEX.range().end);
    }

    #[test]
    fn roundtrips_through_trytes() {
        let tx = sample();
        let encoded = as_transaction_trytes(&tx).unwrap();
        assert_eq!(encoded.len(), TRANSACTION_LENGTH);

        let decoded = as_transaction_object(&encoded, Some(tx.hash.as_str())).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn hash_is_recomputed_when_missing() {
        let encoded = as_transaction_trytes(&sample()).unwrap();
        let decoded = as_transaction_object(&encoded, None).unwrap();
        let expected = trytes(&transaction_hash(&trits(encoded.as_str()).unwrap()).unwrap());
        assert_eq!(decoded.hash, expected);
        assert_eq!(decoded.hash.len(), 81);
    }

    #[test]
    fn essence_matches_serialized_slice() {
        let tx = sample();
        let encoded = as_transaction_trytes(&tx).unwrap();
        assert_eq!(essence_trytes(&tx, tx.last_index).unwrap(), encoded[ESSENCE_RANGE]);
    }

    #[test]
    fn rejects_wrong_length_and_alphabet() {
        assert!(matches!(
            as_transaction_object(&"9".repeat(2672), None),
            Err(BundleError::InvalidTrytes(_))
        ));
        let mut bad = "9".repeat(TRANSACTION_LENGTH);
        bad.replace_range(10..11, "a");
        assert!(matches!(
            as_transaction_object(&bad, None),
            Err(BundleError::InvalidTrytes(_))
        ));
    }

    #[test]
    fn rejects_reserved_value_trytes() {
        let mut encoded = "9".repeat(TRANSACTION_LENGTH);
        encoded.replace_range(2290..2291, "A");
        assert!(matches!(
            as_transaction_object(&encoded, None),
            Err(BundleError::InvalidTrytes(_))
        ));

        // The last usable value tryte is fine.
        let mut encoded = "9".repeat(TRANSACTION_LENGTH);
        encoded.replace_range(2278..2279, "A");
        assert!(as_transaction_object(&encoded, None).is_ok());
    }

    #[test]
    fn rejects_negative_index_on_decode() {
        let mut encoded = "9".repeat(TRANSACTION_LENGTH);
        // 'Z' is -1.
        encoded.replace_range(2331..2332, "Z");
        assert!(matches!(
            as_transaction_object(&encoded, None),
            Err(BundleError::InvalidField {
                field: "currentIndex",
                ..
            })
        ));
    }

    #[test]
    fn rejects_malformed_fields_on_encode() {
        let mut tx = sample();
        tx.address = "A".repeat(80);
        assert!(matches!(
            as_transaction_trytes(&tx),
            Err(BundleError::InvalidField { field: "address", .. })
        ));

        let mut tx = sample();
        tx.tag = "T".repeat(28);
        assert!(matches!(
            as_transaction_trytes(&tx),
            Err(BundleError::InvalidField { field: "tag", .. })
        ));

        let mut tx = sample();
        tx.value = i64::MAX;
        assert!(matches!(
            as_transaction_trytes(&tx),
            Err(BundleError::InvalidField { field: "value", .. })
        ));
    }

    #[test]
    fn empty_tag_falls_back_to_obsolete_tag() {
        let mut tx = sample();
        tx.tag.clear();
        let encoded = as_transaction_trytes(&tx).unwrap();
        assert_eq!(&encoded[TAG.range()], tx.obsolete_tag);
    }

    #[test]
    fn essence_takes_values_too_wide_for_the_wire() {
        let mut tx = sample();
        tx.value = 3_000_000_000_000_000;
        let essence = essence_trytes(&tx, tx.last_index).unwrap();
        let value_trits = trits(&essence[81..108]).unwrap();
        assert_eq!(value_i64(&value_trits).unwrap(), tx.value);
        assert!(matches!(
            as_transaction_trytes(&tx),
            Err(BundleError::InvalidField { field: "value", .. })
        ));
    }

    #[test]
    fn null_transaction_hashes_to_null_hash() {
        let null = "9".repeat(TRANSACTION_LENGTH);
        let hash = transaction_hash(&trits(null.as_str()).unwrap()).unwrap();
        assert_eq!(trytes(&hash), "9".repeat(81));
    }

    #[test]
    fn transaction_hash_known_answer() {
        let pattern = "GYOMKVTSNHVJNCNFBBAH9AAMXLPLLLROQY99QN9DLSJUHDPBLCFFAIQXZA9BKMBJCYSFHFPXAHDWZFEIZ";
        let tx_trytes: String = pattern
            .repeat(34)
            .chars()
            .take(TRANSACTION_LENGTH)
            .collect();
        let hash = transaction_hash(&trits(tx_trytes.as_str()).unwrap()).unwrap();
        assert_eq!(
            trytes(&hash),
            "NXUXEKYLZWEIBV9NPRJDTDAFVEULUMWNFKLJFJJPN9WYWZJBHRD9IOURJEXAQQLHBAHEOXBPMFIRIQRBY"
        );
    }

    #[test]
    fn transaction_hash_checks_length() {
        assert!(matches!(
            transaction_hash(&[0; 100]),
            Err(BundleError::Convert(ConvertError::InvalidLength { .. }))
        ));
    }

    proptest! {
        #[test]
        fn numeric_fields_roundtrip(
            value in -1_000_000_000_000i64..1_000_000_000_000,
            timestamp in 0u64..3_812_798_742_493,
            index in 0usize..9_841,
        ) {
            let mut tx = sample();
            tx.value = value;
            tx.timestamp = timestamp;
            tx.current_index = index;
            tx.last_index = index;
            let encoded = as_transaction_trytes(&tx).unwrap();
            let decoded = as_transaction_object(&encoded, Some(tx.hash.as_str())).unwrap();
            prop_assert_eq!(decoded, tx);
        }
    }
}
