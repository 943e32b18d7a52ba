//! Balanced-ternary addition.

use crate::Trit;

/// Add two trit sequences (least significant trit first).
///
/// The result has the length of the longer operand; a carry out of the top
/// trit is dropped.
pub fn add(a: &[Trit], b: &[Trit]) -> Vec<Trit> {
    let len = a.len().max(b.len());
    let mut out = vec![0; len];
    let mut carry = 0;

    for (i, slot) in out.iter_mut().enumerate() {
        let a_i = a.get(i).copied().unwrap_or(0);
        let b_i = b.get(i).copied().unwrap_or(0);
        let (s, c) = full_add(a_i, b_i, carry);
        *slot = s;
        carry = c;
    }

    out
}

fn sum(a: Trit, b: Trit) -> Trit {
    match a + b {
        2 => -1,
        -2 => 1,
        s => s,
    }
}

fn consensus(a: Trit, b: Trit) -> Trit {
    if a == b {
        a
    } else {
        0
    }
}

fn any(a: Trit, b: Trit) -> Trit {
    (a + b).signum()
}

fn full_add(a: Trit, b: Trit, carry: Trit) -> (Trit, Trit) {
    let half_sum = sum(a, b);
    let half_carry = consensus(a, b);
    let out = sum(half_sum, carry);
    let carry_out = any(half_carry, consensus(half_sum, carry));
    (out, carry_out)
}
