use serde::{Deserialize, Serialize};
use tern_types::pad_trytes;

/// Trytes in a hash-sized field (address, bundle, trunk, branch, hash).
pub const HASH_LENGTH_TRYTES: usize = 81;

/// Trytes in a signature or message fragment.
pub const SIGNATURE_MESSAGE_FRAGMENT_LENGTH: usize = 2187;

/// Trytes in a nonce.
pub const NONCE_LENGTH_TRYTES: usize = 27;

/// `9` repeated to fill a hash-sized field.
pub fn null_hash() -> String {
    pad_trytes("", HASH_LENGTH_TRYTES)
}

pub(crate) fn null_fragment() -> String {
    pad_trytes("", SIGNATURE_MESSAGE_FRAGMENT_LENGTH)
}

/// One transaction of a bundle.
///
/// Fields after `last_index` belong to the ledger (attachment, proof of work
/// and the transaction hash) and stay null-filled until a collaborator
/// attaches the bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub signature_message_fragment: String,
    pub address: String,
    pub value: i64,
    pub obsolete_tag: String,
    pub timestamp: u64,
    pub current_index: usize,
    pub last_index: usize,
    pub bundle: String,
    pub trunk_transaction: String,
    pub branch_transaction: String,
    pub tag: String,
    pub attachment_timestamp: i64,
    pub attachment_timestamp_lower_bound: i64,
    pub attachment_timestamp_upper_bound: i64,
    pub nonce: String,
}

impl Transaction {
    /// Whether this transaction spends from its address.
    pub fn is_input(&self) -> bool {
        self.value < 0
    }

    /// Whether the transaction carries the given bundle hash.
    pub fn belongs_to(&self, bundle_hash: &str) -> bool {
        self.bundle == bundle_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_names() {
        let tx = Transaction {
            hash: null_hash(),
            signature_message_fragment: null_fragment(),
            address: null_hash(),
            value: -3,
            obsolete_tag: "9".repeat(27),
            timestamp: 1,
            current_index: 0,
            last_index: 0,
            bundle: null_hash(),
            trunk_transaction: null_hash(),
            branch_transaction: null_hash(),
            tag: "9".repeat(27),
            attachment_timestamp: 0,
            attachment_timestamp_lower_bound: 0,
            attachment_timestamp_upper_bound: 0,
            nonce: "9".repeat(27),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["value"], -3);
        assert!(json.get("signatureMessageFragment").is_some());
        assert!(json.get("attachmentTimestampUpperBound").is_some());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
        assert!(back.is_input());
    }

    #[test]
    fn null_values_are_nines() {
        assert_eq!(null_hash().len(), 81);
        assert!(null_fragment().chars().all(|c| c == '9'));
        assert_eq!(null_fragment().len(), 2187);
    }
}
