use serde::Serialize;
use tern_crypto::{Kerl, Sponge, HASH_LENGTH};
use tern_signing::validate_signatures;
use tern_types::{trits, trytes};
use tracing::debug;

use crate::codec::essence_trytes;
use crate::transaction::Transaction;

/// Result of bundle validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub transaction_count: usize,
    /// Bundle hash recomputed from the essences, when they could be encoded.
    pub computed_bundle: Option<String>,
    pub value_addresses_valid: bool,
    pub indices_valid: bool,
    pub value_balanced: bool,
    pub bundle_hash_valid: bool,
    pub signatures_valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// One failed check, pinned to a transaction position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub index: usize,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    EmptyBundle,
    MalformedTransaction,
    ValueAddressNotZeroTerminated,
    CurrentIndexMismatch,
    LastIndexMismatch,
    UnbalancedValue,
    BundleHashMismatch,
    InvalidSignature,
}

struct Collector(Vec<Violation>);

impl Collector {
    fn push(&mut self, index: usize, kind: ViolationKind, description: impl Into<String>) {
        let description = description.into();
        debug!(index, ?kind, %description, "bundle violation");
        self.0.push(Violation {
            index,
            kind,
            description,
        });
    }
}

/// Check a bundle's structure, bundle hash and input signatures.
///
/// Every check runs; the report lists each violation found.
pub fn validate_bundle(bundle: &[Transaction]) -> ValidationReport {
    let mut violations = Collector(Vec::new());
    let mut report = ValidationReport {
        transaction_count: bundle.len(),
        computed_bundle: None,
        value_addresses_valid: true,
        indices_valid: true,
        value_balanced: true,
        bundle_hash_valid: true,
        signatures_valid: true,
        violations: Vec::new(),
    };

    let Some(first) = bundle.first() else {
        violations.push(0, ViolationKind::EmptyBundle, "bundle has no transactions");
        report.bundle_hash_valid = false;
        report.violations = violations.0;
        return report;
    };

    let mut total: i128 = 0;
    let mut kerl = Kerl::new();
    let mut essences_ok = true;

    for (index, tx) in bundle.iter().enumerate() {
        total += i128::from(tx.value);

        if tx.value != 0 {
            let address_trits = trits(tx.address.as_str()).unwrap_or_default();
            if address_trits.get(HASH_LENGTH - 1) != Some(&0) {
                report.value_addresses_valid = false;
                violations.push(
                    index,
                    ViolationKind::ValueAddressNotZeroTerminated,
                    "value transaction address must end in a zero trit",
                );
            }
        }

        if tx.current_index != index {
            report.indices_valid = false;
            violations.push(
                index,
                ViolationKind::CurrentIndexMismatch,
                format!("expected current index {index}, got {}", tx.current_index),
            );
        }
        if tx.last_index != bundle.len() - 1 {
            report.indices_valid = false;
            violations.push(
                index,
                ViolationKind::LastIndexMismatch,
                format!("expected last index {}, got {}", bundle.len() - 1, tx.last_index),
            );
        }

        let absorbed = essence_trytes(tx, tx.last_index)
            .and_then(|essence| Ok(trits(essence.as_str())?))
            .and_then(|essence| Ok(kerl.absorb(&essence, 0, essence.len())?));
        if let Err(e) = absorbed {
            essences_ok = false;
            violations.push(index, ViolationKind::MalformedTransaction, e.to_string());
        }
    }

    if total != 0 {
        report.value_balanced = false;
        violations.push(
            0,
            ViolationKind::UnbalancedValue,
            format!("values sum to {total}"),
        );
    }

    if essences_ok {
        let mut hash = [0; HASH_LENGTH];
        if kerl.squeeze(&mut hash, 0, HASH_LENGTH).is_ok() {
            let computed = trytes(&hash);
            for (index, tx) in bundle.iter().enumerate() {
                if !tx.belongs_to(&computed) {
                    report.bundle_hash_valid = false;
                    violations.push(
                        index,
                        ViolationKind::BundleHashMismatch,
                        format!("bundle {} does not match computed {computed}", tx.bundle),
                    );
                }
            }
            report.computed_bundle = Some(computed);
        }
    } else {
        report.bundle_hash_valid = false;
    }

    for (index, fragments) in input_signatures(bundle) {
        let address = &bundle[index].address;
        match validate_signatures(address, &fragments, &first.bundle) {
            Ok(true) => {}
            Ok(false) => {
                report.signatures_valid = false;
                violations.push(
                    index,
                    ViolationKind::InvalidSignature,
                    format!("signature does not match address {address}"),
                );
            }
            Err(e) => {
                report.signatures_valid = false;
                violations.push(index, ViolationKind::InvalidSignature, e.to_string());
            }
        }
    }

    report.violations = violations.0;
    debug!(
        transactions = report.transaction_count,
        violations = report.violations.len(),
        "bundle validated"
    );
    report
}

/// Whether the bundle passes every check of [`validate_bundle`].
pub fn is_bundle(bundle: &[Transaction]) -> bool {
    validate_bundle(bundle).is_valid()
}

/// Signature fragments for each input: the input's own fragment followed by
/// those of the directly following zero-value transactions on the same
/// address.
fn input_signatures(bundle: &[Transaction]) -> Vec<(usize, Vec<&str>)> {
    bundle
        .iter()
        .enumerate()
        .filter(|(_, tx)| tx.is_input())
        .map(|(index, input)| {
            let fragments = bundle[index..]
                .iter()
                .take_while(|tx| tx.address == input.address)
                .enumerate()
                .take_while(|(offset, tx)| *offset == 0 || tx.value == 0)
                .map(|(_, tx)| tx.signature_message_fragment.as_str())
                .collect();
            (index, fragments)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{create_bundle, finalize_bundle};
    use crate::entry::BundleEntry;

    fn unsigned_bundle() -> Vec<Transaction> {
        let entries = vec![
            BundleEntry::transfer("B".repeat(81), 5).with_timestamp(1_000),
            BundleEntry::transfer("C".repeat(81), -5).with_timestamp(1_000),
        ];
        finalize_bundle(create_bundle(&entries)).unwrap()
    }

    fn kinds(report: &ValidationReport) -> Vec<ViolationKind> {
        report.violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn empty_bundle_is_invalid() {
        let report = validate_bundle(&[]);
        assert_eq!(kinds(&report), vec![ViolationKind::EmptyBundle]);
        assert!(!is_bundle(&[]));
    }

    #[test]
    fn structure_and_hash_checks_pass_for_finalized_bundle() {
        let report = validate_bundle(&unsigned_bundle());
        assert!(report.indices_valid);
        assert!(report.value_balanced);
        assert!(report.bundle_hash_valid);
        assert!(report.value_addresses_valid);
        // The input carries no signature yet.
        assert!(!report.signatures_valid);
        assert_eq!(kinds(&report), vec![ViolationKind::InvalidSignature]);
        assert_eq!(report.violations[0].index, 1);
    }

    #[test]
    fn detects_index_and_value_tampering() {
        let mut bundle = unsigned_bundle();
        bundle[1].current_index = 7;
        bundle[0].value = 6;
        let report = validate_bundle(&bundle);
        let kinds = kinds(&report);
        assert!(kinds.contains(&ViolationKind::CurrentIndexMismatch));
        assert!(kinds.contains(&ViolationKind::UnbalancedValue));
        assert!(kinds.contains(&ViolationKind::BundleHashMismatch));
        assert!(!report.indices_valid);
        assert!(!report.value_balanced);
    }

    #[test]
    fn detects_last_index_mismatch() {
        let mut bundle = unsigned_bundle();
        bundle[0].last_index = 0;
        let report = validate_bundle(&bundle);
        assert!(kinds(&report).contains(&ViolationKind::LastIndexMismatch));
    }

    #[test]
    fn detects_value_address_with_nonzero_last_trit() {
        let mut bundle = unsigned_bundle();
        // 'M' is 13: trits [1, 1, 1].
        bundle[0].address = "M".repeat(81);
        let report = validate_bundle(&bundle);
        assert!(!report.value_addresses_valid);
        assert!(kinds(&report).contains(&ViolationKind::ValueAddressNotZeroTerminated));
    }

    #[test]
    fn malformed_transaction_is_reported() {
        let mut bundle = unsigned_bundle();
        bundle[0].obsolete_tag = "lowercase".into();
        let report = validate_bundle(&bundle);
        assert!(kinds(&report).contains(&ViolationKind::MalformedTransaction));
        assert!(!report.bundle_hash_valid);
        assert!(report.computed_bundle.is_none());
    }

    #[test]
    fn input_fragments_follow_the_input() {
        let entries = vec![
            BundleEntry::transfer("C".repeat(81), -5).with_length(2),
            BundleEntry::transfer("C".repeat(81), 0),
            BundleEntry::transfer("B".repeat(81), 5),
        ];
        let bundle = create_bundle(&entries);
        let inputs = input_signatures(&bundle);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].0, 0);
        assert_eq!(inputs[0].1.len(), 3);
    }
}
