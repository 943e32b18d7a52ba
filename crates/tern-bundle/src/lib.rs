//! Bundle construction, finalization and validation.
//!
//! A bundle is an ordered list of [`Transaction`]s that move value between
//! addresses atomically. Entries are appended with [`add_entry`], the bundle
//! hash is stamped by [`finalize_bundle`], signatures are attached with
//! [`add_trytes`], and [`validate_bundle`] checks the result on the receiving
//! side.
//!
//! # Key Types
//!
//! - [`Transaction`] — one transaction with its ledger fields
//! - [`BundleEntry`] — a partially specified transfer, resolved with defaults
//! - [`BundleConfig`] — finalization tuning
//! - [`ValidationReport`] — per-check outcome of [`validate_bundle`]
//! - [`BundleError`] — construction, finalization and codec failures

pub mod bundle;
pub mod codec;
pub mod config;
pub mod entry;
pub mod error;
pub mod transaction;
pub mod validator;

pub use bundle::{add_entry, add_trytes, create_bundle, finalize_bundle, finalize_bundle_with};
pub use codec::{
    as_transaction_object, as_transaction_trytes, transaction_hash, ESSENCE_RANGE,
    TRANSACTION_LENGTH, TRANSACTION_LENGTH_TRITS,
};
pub use config::BundleConfig;
pub use entry::{BundleEntry, ResolvedEntry};
pub use error::{BundleError, BundleResult};
pub use tern_signing::normalized_bundle_hash;
pub use transaction::{
    null_hash, Transaction, HASH_LENGTH_TRYTES, NONCE_LENGTH_TRYTES,
    SIGNATURE_MESSAGE_FRAGMENT_LENGTH,
};
pub use validator::{is_bundle, validate_bundle, ValidationReport, Violation, ViolationKind};
