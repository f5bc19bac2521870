/// Bits Kernel v1 — Property Checks
///
/// Algebraic properties of the four primitives, checked for concrete inputs.
/// `check_*` panics on failure; `try_*` returns the violation instead.

use crate::bits::{shift_left, shift_right, unsigned_shift_right, xor, WIDTH};
use crate::domain::{Outcome, ShiftPolicy};
use crate::engine::evaluate;
use crate::error::KernelError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check every shift property for `x` and a count `n` in `[0, 31]`.
pub fn check_shift_properties(x: i32, n: u32) {
    if let Err(e) = try_check_shift_properties(x, n) {
        panic!("{}", e);
    }
}

/// Check every xor property for the pair `(a, b)`.
pub fn check_xor_properties(a: i32, b: i32) {
    if let Err(e) = try_check_xor_properties(a, b) {
        panic!("{}", e);
    }
}

pub fn try_check_shift_properties(x: i32, n: u32) -> Result<(), KernelError> {
    if n >= WIDTH {
        return Err(violation(
            "shift_count_range",
            format!("count {} outside [0, 31]", n),
        ));
    }
    try_check_shift_left_multiplies(x, n)?;
    try_check_unsigned_zero_fill(x, n)?;
    try_check_arithmetic_sign_fill(x, n)?;
    Ok(())
}

pub fn try_check_xor_properties(a: i32, b: i32) -> Result<(), KernelError> {
    if xor(a, b) != xor(b, a) {
        return Err(violation(
            "xor_commutative",
            format!("xor({}, {}) != xor({}, {})", a, b, b, a),
        ));
    }
    if xor(a, a) != 0 {
        return Err(violation("xor_self_zero", format!("xor({}, {}) != 0", a, a)));
    }
    if xor(a, 0) != a {
        return Err(violation("xor_identity", format!("xor({}, 0) != {}", a, a)));
    }
    if xor(xor(a, b), b) != a {
        return Err(violation(
            "xor_self_inverse",
            format!("xor(xor({}, {}), {}) != {}", a, b, b, a),
        ));
    }
    Ok(())
}

/// Re-evaluate a recorded outcome and compare its result.
/// Used when restoring persisted outcomes.
pub fn try_verify_outcome(outcome: &Outcome, policy: ShiftPolicy) -> Result<(), KernelError> {
    let got = evaluate(&outcome.operation(), policy)?;
    if got != outcome.result {
        return Err(violation(
            "outcome_result",
            format!(
                "sequence {}: {}({}, {}) recorded {} but evaluates to {}",
                outcome.sequence, outcome.op, outcome.lhs, outcome.rhs, outcome.result, got
            ),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

/// shift_left(x, n) == x * 2^n truncated to 32 bits.
fn try_check_shift_left_multiplies(x: i32, n: u32) -> Result<(), KernelError> {
    let expected = (x as i64).wrapping_mul(1i64 << n) as i32;
    let got = shift_left(x, n as i32);
    if got != expected {
        return Err(violation(
            "shift_left_multiply",
            format!("shift_left({}, {}) = {}, expected {}", x, n, got, expected),
        ));
    }
    Ok(())
}

/// The top n bits of a logical shift are zero.
fn try_check_unsigned_zero_fill(x: i32, n: u32) -> Result<(), KernelError> {
    let got = unsigned_shift_right(x, n as i32) as u32;
    if top_bits(got, n) != 0 {
        return Err(violation(
            "unsigned_zero_fill",
            format!("unsigned_shift_right({}, {}) = {:#010x}", x, n, got),
        ));
    }
    Ok(())
}

/// Non-negative: arithmetic equals logical. Negative: top n bits are one.
fn try_check_arithmetic_sign_fill(x: i32, n: u32) -> Result<(), KernelError> {
    let arith = shift_right(x, n as i32);
    if x >= 0 {
        let logical = unsigned_shift_right(x, n as i32);
        if arith != logical {
            return Err(violation(
                "arithmetic_equals_logical",
                format!("shift_right({}, {}) = {} but logical = {}", x, n, arith, logical),
            ));
        }
    } else if top_bits(arith as u32, n) != ones(n) {
        return Err(violation(
            "arithmetic_sign_fill",
            format!("shift_right({}, {}) = {:#010x}", x, n, arith as u32),
        ));
    }
    Ok(())
}

/// The top `n` bits of `value`, right-aligned.
fn top_bits(value: u32, n: u32) -> u32 {
    if n == 0 {
        0
    } else {
        value >> (WIDTH - n)
    }
}

fn ones(n: u32) -> u32 {
    if n == 0 {
        0
    } else {
        u32::MAX >> (WIDTH - n)
    }
}

fn violation(tag: &str, detail: String) -> KernelError {
    KernelError::PropertyViolation(format!("[PROPERTY:{}] {}", tag, detail))
}
