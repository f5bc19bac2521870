/// Bits Kernel v1 — Bit Primitives
///
/// Four pure operations over 32-bit two's-complement integers.
/// Shift counts are always masked to their low 5 bits.

/// Operand width in bits.
pub const WIDTH: u32 = 32;

/// Mask applied to every shift count before shifting.
pub const SHIFT_MASK: i32 = (WIDTH as i32) - 1;

/// Reduce a shift count to `[0, 31]` by keeping its low 5 bits.
/// Negative counts keep their two's-complement low bits: `-1` becomes 31.
pub fn normalize_shift(positions: i32) -> u32 {
    (positions & SHIFT_MASK) as u32
}

/// Left shift. Vacated low bits are zero, bits past bit 31 are dropped.
pub fn shift_left(bits: i32, positions: i32) -> i32 {
    bits.wrapping_shl(normalize_shift(positions))
}

/// Arithmetic right shift. Vacated high bits copy the sign bit.
pub fn shift_right(bits: i32, positions: i32) -> i32 {
    bits.wrapping_shr(normalize_shift(positions))
}

/// Logical right shift. Vacated high bits are zero regardless of sign.
pub fn unsigned_shift_right(bits: i32, positions: i32) -> i32 {
    (bits as u32).wrapping_shr(normalize_shift(positions)) as i32
}

pub fn xor(bits1: i32, bits2: i32) -> i32 {
    bits1 ^ bits2
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_concrete_cases() {
        assert_eq!(shift_left(1, 4), 16);
        assert_eq!(shift_right(-8, 1), -4);
        assert_eq!(unsigned_shift_right(-8, 1), 2147483644);
        assert_eq!(xor(5, 3), 6);
    }

    #[test]
    fn test_shift_left_drops_high_bits() {
        assert_eq!(shift_left(1, 31), i32::MIN);
        assert_eq!(shift_left(3, 31), i32::MIN);
        assert_eq!(shift_left(-1, 1), -2);
    }

    #[test]
    fn test_shift_right_extremes() {
        assert_eq!(shift_right(i32::MIN, 31), -1);
        assert_eq!(unsigned_shift_right(i32::MIN, 31), 1);
        assert_eq!(shift_right(i32::MAX, 31), 0);
        assert_eq!(unsigned_shift_right(-1, 0), -1);
    }

    #[test]
    fn test_shift_count_is_masked() {
        assert_eq!(normalize_shift(32), 0);
        assert_eq!(normalize_shift(33), 1);
        assert_eq!(normalize_shift(-1), 31);
        assert_eq!(normalize_shift(-32), 0);

        assert_eq!(shift_left(1, 32), 1);
        assert_eq!(shift_left(1, 36), 16);
        assert_eq!(shift_left(1, -1), i32::MIN);
        assert_eq!(shift_right(-8, 33), -4);
        assert_eq!(unsigned_shift_right(-8, 33), 2147483644);
        assert_eq!(unsigned_shift_right(-1, -1), 1);
    }

    #[test]
    fn test_xor_identities() {
        assert_eq!(xor(0x0F0F, 0x0F0F), 0);
        assert_eq!(xor(-1, 0), -1);
        assert_eq!(xor(-1, i32::MAX), i32::MIN);
    }

    proptest! {
        #[test]
        fn prop_shift_left_is_truncated_multiply(x in any::<i32>(), n in 0i32..32) {
            let expected = ((x as i64) << n) as i32;
            prop_assert_eq!(shift_left(x, n), expected);
        }

        #[test]
        fn prop_unsigned_shift_clears_top_bits(x in any::<i32>(), n in 1i32..32) {
            let result = unsigned_shift_right(x, n) as u32;
            prop_assert_eq!(result >> (WIDTH - n as u32), 0);
        }

        #[test]
        fn prop_shift_right_sign_fill(x in any::<i32>(), n in 0i32..32) {
            let arith = shift_right(x, n);
            if x >= 0 {
                prop_assert_eq!(arith, unsigned_shift_right(x, n));
            } else if n > 0 {
                let top = !0u32 << (WIDTH - n as u32);
                prop_assert_eq!(arith as u32 & top, top);
            }
        }

        #[test]
        fn prop_masking_matches_low_bits(x in any::<i32>(), n in any::<i32>()) {
            let low = n & SHIFT_MASK;
            prop_assert_eq!(shift_left(x, n), shift_left(x, low));
            prop_assert_eq!(shift_right(x, n), shift_right(x, low));
            prop_assert_eq!(unsigned_shift_right(x, n), unsigned_shift_right(x, low));
        }

        #[test]
        fn prop_xor_laws(a in any::<i32>(), b in any::<i32>()) {
            prop_assert_eq!(xor(a, b), xor(b, a));
            prop_assert_eq!(xor(a, a), 0);
            prop_assert_eq!(xor(a, 0), a);
            prop_assert_eq!(xor(xor(a, b), b), a);
        }
    }
}
