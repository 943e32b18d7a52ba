//! Foundation types for the ternary signing stack.
//!
//! Everything above this crate works on balanced-ternary digits: a *trit* is
//! an `i8` in `{-1, 0, 1}` and a *tryte* is one of the 27 symbols `9A-Z`
//! standing for three trits. This crate owns the conversions between trits,
//! trytes and integers, and the ternary addition used by key derivation and
//! bundle finalization.
//!
//! # Key Items
//!
//! - [`trits`] / [`trytes`] — tryte strings and integers to trits and back
//! - [`value`] / [`from_value`] — balanced-ternary integer evaluation
//! - [`add`] — ripple-carry ternary addition
//! - [`ConvertError`] — conversion failures

pub mod arith;
pub mod converter;
pub mod error;

pub use arith::add;
pub use converter::{
    from_value, is_trytes, is_trytes_of_length, pad_tag, pad_trits, pad_trytes, trits,
    trits_into, tryte_value, trytes, value, value_i64, TritInput, TAG_LENGTH_TRYTES,
    TRYTE_ALPHABET, TRYTE_WIDTH,
};
pub use error::{ConvertError, ConvertResult};

/// A balanced-ternary digit: `-1`, `0` or `1`.
pub type Trit = i8;
