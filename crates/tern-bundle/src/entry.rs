use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tern_types::{pad_tag, pad_trytes, TAG_LENGTH_TRYTES};

use crate::transaction::{null_fragment, null_hash, SIGNATURE_MESSAGE_FRAGMENT_LENGTH};

/// A request for one or more transactions sharing an address.
///
/// Every field is optional; [`BundleEntry::with_defaults`] fills the gaps.
/// Zero and empty values count as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleEntry {
    /// Number of transactions; inputs need one per security level.
    pub length: Option<usize>,
    pub address: Option<String>,
    pub value: Option<i64>,
    pub tag: Option<String>,
    /// Unix seconds.
    pub timestamp: Option<u64>,
    pub signature_message_fragments: Option<Vec<String>>,
}

/// A [`BundleEntry`] with every field resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub length: usize,
    pub address: String,
    pub value: i64,
    pub tag: String,
    pub timestamp: u64,
    /// Exactly `length` fragments of 2187 trytes.
    pub signature_message_fragments: Vec<String>,
}

impl BundleEntry {
    /// An entry moving `value` to or from `address`.
    pub fn transfer(address: impl Into<String>, value: i64) -> Self {
        Self {
            address: Some(address.into()),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Fill missing fields: one transaction, the null address and tag, zero
    /// value, the current time minus one second, and null fragments.
    /// Supplied fragments are padded to 2187 trytes.
    pub fn with_defaults(&self) -> ResolvedEntry {
        let length = self.length.filter(|&l| l > 0).unwrap_or(1);

        let mut fragments: Vec<String> = self
            .signature_message_fragments
            .iter()
            .flatten()
            .take(length)
            .map(|f| pad_trytes(f, SIGNATURE_MESSAGE_FRAGMENT_LENGTH))
            .collect();
        fragments.resize_with(length, null_fragment);

        ResolvedEntry {
            length,
            address: self
                .address
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(null_hash),
            value: self.value.unwrap_or(0),
            tag: self
                .tag
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(pad_tag)
                .unwrap_or_else(|| pad_trytes("", TAG_LENGTH_TRYTES)),
            timestamp: self
                .timestamp
                .filter(|&t| t > 0)
                .unwrap_or_else(default_timestamp),
            signature_message_fragments: fragments,
        }
    }
}

fn default_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().saturating_sub(1))
        .unwrap_or_default()
}
