//! Hamming distance and bit-population primitives

use crate::{CoreError, Result, Word};

/// Widest word the metrics operate on
pub const MAX_WIDTH: u32 = Word::BITS;

/// All-ones pattern covering the low `width` bits
#[inline]
pub fn mask(width: u32) -> Word {
    if width >= MAX_WIDTH {
        Word::MAX
    } else {
        (1 << width) - 1
    }
}

/// Validate a word width
pub fn check_width(width: u32) -> Result<u32> {
    if width == 0 || width > MAX_WIDTH {
        return Err(CoreError::InvalidWidth { width });
    }
    Ok(width)
}

/// Count of set bits
#[inline]
pub fn popcount(x: Word) -> u32 {
    x.count_ones()
}

/// Number of differing bits between `a` and `b`, both taken as exactly
/// `width` bits. Anything above `width` is ignored.
#[inline]
pub fn hamming_distance(a: Word, b: Word, width: u32) -> u32 {
    popcount((a ^ b) & mask(width))
}

/// XOR fold of every bit in `x` (0 or 1)
#[inline]
pub fn parity(x: Word) -> u8 {
    (popcount(x) & 1) as u8
}

/// Single bit at `pos` (0 = least significant)
#[inline]
pub fn bit(x: Word, pos: u32) -> u8 {
    ((x >> pos) & 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_mask() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(4), 0xF);
        assert_eq!(mask(32), 0xFFFF_FFFF);
        assert_eq!(mask(64), u64::MAX);
        assert_eq!(mask(80), u64::MAX);
    }

    #[test]
    fn test_hamming_distance_known_values() {
        assert_eq!(hamming_distance(0, 0, 32), 0);
        assert_eq!(hamming_distance(0, 0xFF00_0000, 32), 8);
        assert_eq!(hamming_distance(0xAAAA_AAAA, 0x5555_5555, 32), 32);
        assert_eq!(hamming_distance(0xCCCC_CCCC, 0xAAAA_AAAA, 32), 16);
    }

    #[test]
    fn test_hamming_distance_ignores_high_bits() {
        // Bits above the width must not count
        assert_eq!(hamming_distance(0xF0, 0x00, 4), 0);
        assert_eq!(hamming_distance(0x1_0000_0001, 0x0, 32), 1);
    }

    #[test]
    fn test_parity_and_bit() {
        assert_eq!(parity(0), 0);
        assert_eq!(parity(0b1011), 1);
        assert_eq!(parity(0b1001), 0);
        assert_eq!(bit(0b100, 2), 1);
        assert_eq!(bit(0b100, 1), 0);
    }

    #[test]
    fn test_check_width() {
        assert!(check_width(1).is_ok());
        assert!(check_width(64).is_ok());
        assert_eq!(check_width(0), Err(CoreError::InvalidWidth { width: 0 }));
        assert!(check_width(65).is_err());
    }

    #[quickcheck]
    fn prop_distance_is_symmetric(a: u64, b: u64, width: u8) -> bool {
        let width = u32::from(width % 65);
        hamming_distance(a, b, width) == hamming_distance(b, a, width)
    }

    #[quickcheck]
    fn prop_distance_bounded_by_width(a: u64, b: u64, width: u8) -> bool {
        let width = u32::from(width % 65);
        hamming_distance(a, b, width) <= width
    }

    #[quickcheck]
    fn prop_triangle_inequality(a: u64, b: u64, c: u64) -> bool {
        hamming_distance(a, c, 64) <= hamming_distance(a, b, 64) + hamming_distance(b, c, 64)
    }
}
