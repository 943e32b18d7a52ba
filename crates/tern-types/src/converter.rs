//! Conversions between tryte strings, trit sequences and integers.
//!
//! Trit sequences are little-endian: index 0 holds the least significant
//! trit. A tryte covers three consecutive trits, so the first character of a
//! tryte string is the least significant tryte.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};

use crate::error::{ConvertError, ConvertResult};
use crate::Trit;

/// Number of trits in a tryte.
pub const TRYTE_WIDTH: usize = 3;

/// All tryte symbols, ordered by their unsigned index.
pub const TRYTE_ALPHABET: &str = "9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of a tag in trytes.
pub const TAG_LENGTH_TRYTES: usize = 27;

/// Tryte index -> trits lookup table.
const TRYTES_TRITS_LUT: [[Trit; TRYTE_WIDTH]; 27] = [
    [0, 0, 0],
    [1, 0, 0],
    [-1, 1, 0],
    [0, 1, 0],
    [1, 1, 0],
    [-1, -1, 1],
    [0, -1, 1],
    [1, -1, 1],
    [-1, 0, 1],
    [0, 0, 1],
    [1, 0, 1],
    [-1, 1, 1],
    [0, 1, 1],
    [1, 1, 1],
    [-1, -1, -1],
    [0, -1, -1],
    [1, -1, -1],
    [-1, 0, -1],
    [0, 0, -1],
    [1, 0, -1],
    [-1, 1, -1],
    [0, 1, -1],
    [1, 1, -1],
    [-1, -1, 0],
    [0, -1, 0],
    [1, -1, 0],
    [-1, 0, 0],
];

/// Input accepted by [`trits`].
#[derive(Clone, Debug, PartialEq)]
pub enum TritInput<'a> {
    /// A tryte string.
    Trytes(&'a str),
    /// An integer of any size.
    Integer(BigInt),
    /// A floating-point number; only whole, finite values convert.
    Number(f64),
}

impl<'a> From<&'a str> for TritInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Trytes(s)
    }
}

impl<'a> From<&'a String> for TritInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Trytes(s.as_str())
    }
}

impl From<BigInt> for TritInput<'_> {
    fn from(v: BigInt) -> Self {
        Self::Integer(v)
    }
}

impl From<&BigInt> for TritInput<'_> {
    fn from(v: &BigInt) -> Self {
        Self::Integer(v.clone())
    }
}

impl From<f64> for TritInput<'_> {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

macro_rules! impl_integer_input {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TritInput<'_> {
                fn from(v: $ty) -> Self {
                    Self::Integer(BigInt::from(v))
                }
            }
        )*
    };
}

impl_integer_input!(i32, i64, u32, u64, usize);

/// Convert a tryte string or an integer to trits.
///
/// Integers produce their minimal balanced-ternary representation (zero
/// produces an empty sequence). Floating-point input must be a whole,
/// finite number.
pub fn trits<'a>(input: impl Into<TritInput<'a>>) -> ConvertResult<Vec<Trit>> {
    match input.into() {
        TritInput::Trytes(s) => {
            let mut out = vec![0; s.len() * TRYTE_WIDTH];
            trits_into(s, &mut out)?;
            Ok(out)
        }
        TritInput::Integer(v) => Ok(from_value(v)),
        TritInput::Number(n) => {
            if !n.is_finite() || n.fract() != 0.0 {
                return Err(ConvertError::IllegalInput(n.to_string()));
            }
            let v = BigInt::from_f64(n).ok_or_else(|| ConvertError::IllegalInput(n.to_string()))?;
            Ok(from_value(v))
        }
    }
}

/// Expand a tryte string into a caller-provided trit buffer.
///
/// The buffer must hold at least `3 * trytes.len()` trits; only that prefix
/// is written.
pub fn trits_into(trytes: &str, state: &mut [Trit]) -> ConvertResult<()> {
    let needed = trytes.len() * TRYTE_WIDTH;
    if state.len() < needed {
        return Err(ConvertError::InvalidLength {
            expected: needed,
            actual: state.len(),
        });
    }
    for (chunk, c) in state.chunks_exact_mut(TRYTE_WIDTH).zip(trytes.chars()) {
        let index = tryte_index(c)?;
        chunk.copy_from_slice(&TRYTES_TRITS_LUT[index]);
    }
    Ok(())
}

/// Convert trits to a tryte string.
///
/// Callers are expected to pad to a multiple of three; a trailing partial
/// group is encoded as if zero-padded.
pub fn trytes(trits: &[Trit]) -> String {
    trits
        .chunks(TRYTE_WIDTH)
        .map(|chunk| {
            let v = chunk
                .iter()
                .rev()
                .fold(0i32, |acc, &t| acc * 3 + i32::from(t));
            debug_assert!((-13..=13).contains(&v), "trits out of range: {chunk:?}");
            TRYTE_ALPHABET.as_bytes()[v.rem_euclid(27) as usize] as char
        })
        .collect()
}

/// Evaluate trits as a balanced-ternary integer.
pub fn value(trits: &[Trit]) -> BigInt {
    trits
        .iter()
        .rev()
        .fold(BigInt::zero(), |acc, &t| acc * 3 + t)
}

/// Evaluate trits as a balanced-ternary integer that must fit an `i64`.
pub fn value_i64(trits: &[Trit]) -> ConvertResult<i64> {
    value(trits)
        .to_i64()
        .ok_or(ConvertError::ValueOutOfRange("i64"))
}

/// Minimal balanced-ternary representation of an integer.
pub fn from_value(value: impl Into<BigInt>) -> Vec<Trit> {
    let value = value.into();
    let three = BigInt::from(3);
    let mut remaining = value.abs();
    let mut out = Vec::new();

    while !remaining.is_zero() {
        let (quotient, rem) = remaining.div_rem(&three);
        remaining = quotient;
        let mut trit = rem.to_i8().unwrap_or_default();
        if trit > 1 {
            trit = -1;
            remaining += 1;
        }
        out.push(trit);
    }

    if value.is_negative() {
        out.iter_mut().for_each(|t| *t = -*t);
    }
    out
}

/// Signed value of a single tryte (`-13..=13`), or `None` if `c` is not a tryte.
pub fn tryte_value(c: char) -> Option<i8> {
    let index = TRYTE_ALPHABET.find(c)? as i8;
    Some(if index > 13 { index - 27 } else { index })
}

/// Zero-extend trits to `length`. Longer input is returned unchanged.
pub fn pad_trits(trits: &[Trit], length: usize) -> Vec<Trit> {
    let mut out = trits.to_vec();
    if out.len() < length {
        out.resize(length, 0);
    }
    out
}

/// Extend a tryte string with `9`s to `length`. Longer input is returned unchanged.
pub fn pad_trytes(trytes: &str, length: usize) -> String {
    let mut out = trytes.to_owned();
    while out.len() < length {
        out.push('9');
    }
    out
}

/// Pad a tag to its fixed tryte length.
pub fn pad_tag(tag: &str) -> String {
    pad_trytes(tag, TAG_LENGTH_TRYTES)
}

/// Returns `true` if every character is a tryte.
pub fn is_trytes(s: &str) -> bool {
    s.chars().all(|c| TRYTE_ALPHABET.contains(c))
}

/// Returns `true` if `s` consists of exactly `length` trytes.
pub fn is_trytes_of_length(s: &str, length: usize) -> bool {
    s.len() == length && is_trytes(s)
}

fn tryte_index(c: char) -> ConvertResult<usize> {
    TRYTE_ALPHABET
        .find(c)
        .ok_or_else(|| ConvertError::InvalidTrytes(format!("unexpected character {c:?}")))
}
