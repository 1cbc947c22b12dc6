//! Minimum-distance codebooks
//!
//! A [`Codebook`] maps every symbol `0..len` to a fixed-width codeword such
//! that any two codewords differ in at least `min_distance` bit positions.
//! Codebooks are checked once at construction and never change afterwards,
//! so they can be shared freely between encoders and decoders.
//!
//! Two construction modes exist:
//!
//! - [`Codebook::fixed`] wraps a hand-authored table and rejects it if any
//!   pair of codewords is too close.
//! - [`Codebook::generate`] walks the codeword space in ascending order and
//!   greedily keeps every candidate that is far enough from all codewords
//!   kept so far.
//!
//! # Known limitation
//!
//! Greedy ascending search is reproducible but not optimal: it can reject a
//! candidate that a smarter search would keep, and so may report
//! [`FrameError::CodebookExhausted`] for parameters where a larger code
//! exists.

use crate::{FrameError, Result, Symbol};
use hamcode_core::metric::{check_width, hamming_distance, mask};
use hamcode_core::Word;
use serde::Serialize;
use tracing::{debug, warn};

/// Hand-authored 32-bit table for 4-bit symbols, pairwise distance >= 8
const STANDARD_TABLE: [Word; 16] = [
    0b00000000000000000000000000000000,
    0b11111111000000000000000000000000,
    0b00000000111111110000000000000000,
    0b00000000000000001111111100000000,
    0b11110000111100001111000011110000,
    0b00001111000011110000111100001111,
    0b11111111111100000000000011111111,
    0b00000000111111111111111100000000,
    0b01010101010101010101010101010101,
    0b10101010101010101010101010101010,
    0b11001100110011001100110011001100,
    0b11111111111111110000000000000000,
    0b00000000000000001111111111111111,
    0b11110000111100001111000000001111,
    0b11000011110000111100001111000011,
    0b11111111111111111111111100000000,
];

const STANDARD_WIDTH: u32 = 32;
const STANDARD_MIN_DISTANCE: u32 = 7;

/// A pair of symbols whose codewords are closer than allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub first: Symbol,
    pub second: Symbol,
    pub distance: u32,
}

/// Every violating pair, in lexicographic `(first, second)` order
pub fn violations(codewords: &[Word], width: u32, min_distance: u32) -> Vec<Violation> {
    pairs(codewords, width)
        .filter(|v| v.distance < min_distance)
        .collect()
}

/// First violating pair, if any
pub fn first_violation(codewords: &[Word], width: u32, min_distance: u32) -> Option<Violation> {
    pairs(codewords, width).find(|v| v.distance < min_distance)
}

/// True when every pair of codewords is at least `min_distance` apart
pub fn verify(codewords: &[Word], width: u32, min_distance: u32) -> bool {
    first_violation(codewords, width, min_distance).is_none()
}

fn pairs(codewords: &[Word], width: u32) -> impl Iterator<Item = Violation> + '_ {
    codewords.iter().enumerate().flat_map(move |(i, &a)| {
        codewords[i + 1..].iter().enumerate().map(move |(offset, &b)| Violation {
            first: i as Symbol,
            second: (i + 1 + offset) as Symbol,
            distance: hamming_distance(a, b, width),
        })
    })
}

/// Immutable symbol to codeword mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Codebook {
    width: u32,
    min_distance: u32,
    codewords: Vec<Word>,
}

impl Codebook {
    /// Wrap a literal table, where `table[s]` is the codeword for symbol `s`
    pub fn fixed(table: &[Word], width: u32, min_distance: u32) -> Result<Self> {
        check_width(width)?;

        if table.is_empty() {
            return Err(FrameError::InvalidTable {
                msg: "Codebook table is empty".to_string(),
            });
        }

        if let Some(&word) = table.iter().find(|&&word| word & !mask(width) != 0) {
            return Err(FrameError::InvalidValueRange {
                value: word,
                bits: width,
            });
        }

        if let Some(v) = first_violation(table, width, min_distance) {
            warn!(
                "Codebook rejected: symbols {:#x} and {:#x} differ in {} bits (< {})",
                v.first, v.second, v.distance, min_distance
            );
            return Err(FrameError::InvalidCodebook {
                first: v.first,
                second: v.second,
                distance: v.distance,
                min_distance,
            });
        }

        debug!(
            "Loaded fixed codebook: {} symbols, {} bits, D_min {}",
            table.len(),
            width,
            min_distance
        );

        Ok(Self {
            width,
            min_distance,
            codewords: table.to_vec(),
        })
    }

    /// Greedy exhaustive search for `symbol_count` codewords of `width` bits
    ///
    /// Candidates are tried in ascending numeric order starting at 0, and a
    /// candidate is kept iff it is at least `min_distance` away from every
    /// codeword kept so far. The result depends only on the parameters.
    pub fn generate(symbol_count: usize, width: u32, min_distance: u32) -> Result<Self> {
        check_width(width)?;

        if symbol_count == 0 {
            return Err(FrameError::InvalidTable {
                msg: "Symbol count must be greater than 0".to_string(),
            });
        }

        let mut codewords: Vec<Word> = Vec::with_capacity(symbol_count);
        for candidate in 0..=mask(width) {
            let far_enough = codewords
                .iter()
                .all(|&accepted| hamming_distance(candidate, accepted, width) >= min_distance);

            if far_enough {
                codewords.push(candidate);
                if codewords.len() == symbol_count {
                    debug!(
                        "Generated codebook: {} symbols, {} bits, D_min {}, last candidate {:#x}",
                        symbol_count, width, min_distance, candidate
                    );
                    return Ok(Self {
                        width,
                        min_distance,
                        codewords,
                    });
                }
            }
        }

        warn!(
            "Codebook search exhausted the {}-bit space with {} of {} codewords",
            width,
            codewords.len(),
            symbol_count
        );

        Err(FrameError::CodebookExhausted {
            requested: symbol_count,
            found: codewords.len(),
            width,
        })
    }

    /// 16 symbols on 32-bit codewords with D_min = 7
    pub fn standard() -> Self {
        Self {
            width: STANDARD_WIDTH,
            min_distance: STANDARD_MIN_DISTANCE,
            codewords: STANDARD_TABLE.to_vec(),
        }
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.codewords.len()
    }

    /// Always false for a constructed codebook
    pub fn is_empty(&self) -> bool {
        self.codewords.is_empty()
    }

    /// Codeword width in bits
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Declared minimum pairwise distance
    pub fn min_distance(&self) -> u32 {
        self.min_distance
    }

    /// Smallest pairwise distance actually present, `None` for a single codeword
    pub fn actual_min_distance(&self) -> Option<u32> {
        pairs(&self.codewords, self.width).map(|v| v.distance).min()
    }

    /// Errors per word that nearest-neighbour decoding is guaranteed to correct
    pub fn correctable_errors(&self) -> u32 {
        self.min_distance.saturating_sub(1) / 2
    }

    /// Codeword for `symbol`
    pub fn codeword(&self, symbol: Symbol) -> Option<Word> {
        self.codewords.get(symbol as usize).copied()
    }

    /// All codewords, indexed by symbol
    pub fn codewords(&self) -> &[Word] {
        &self.codewords
    }

    /// Iterate `(symbol, codeword)` in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, Word)> + '_ {
        self.codewords
            .iter()
            .enumerate()
            .map(|(symbol, &word)| (symbol as Symbol, word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_standard_codebook_is_valid() {
        let book = Codebook::standard();
        assert_eq!(book.len(), 16);
        assert_eq!(book.width(), 32);
        assert_eq!(book.min_distance(), 7);
        assert_eq!(book.actual_min_distance(), Some(8));
        assert_eq!(book.correctable_errors(), 3);
        assert!(verify(book.codewords(), 32, 7));

        // Same table through the checked constructor
        assert_eq!(Codebook::fixed(&STANDARD_TABLE, 32, 7).unwrap(), book);
    }

    #[test]
    fn test_standard_codebook_symbol_a() {
        let book = Codebook::standard();
        assert_eq!(book.codeword(0xA), Some(0xCCCC_CCCC));
        assert_eq!(book.codeword(0x10), None);
    }

    #[test]
    fn test_fixed_rejects_close_pair() {
        let table = [0x00, 0x0F, 0x01];
        let err = Codebook::fixed(&table, 8, 3).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidCodebook {
                first: 0,
                second: 2,
                distance: 1,
                min_distance: 3,
            }
        );
    }

    #[test]
    fn test_fixed_rejects_bad_tables() {
        assert!(matches!(
            Codebook::fixed(&[], 8, 1),
            Err(FrameError::InvalidTable { .. })
        ));
        assert_eq!(
            Codebook::fixed(&[0x00, 0x1FF], 8, 1),
            Err(FrameError::InvalidValueRange { value: 0x1FF, bits: 8 })
        );
        assert!(matches!(
            Codebook::fixed(&[0x00], 0, 1),
            Err(FrameError::Core(_))
        ));
    }

    #[test]
    fn test_violations_lists_every_pair() {
        let table = [0b000, 0b001, 0b011];
        let found = violations(&table, 3, 2);
        assert_eq!(
            found,
            vec![
                Violation { first: 0, second: 1, distance: 1 },
                Violation { first: 1, second: 2, distance: 1 },
            ]
        );
        assert_eq!(first_violation(&table, 3, 2), Some(found[0]));
        assert!(!verify(&table, 3, 2));
        assert!(verify(&table, 3, 1));
    }

    #[test]
    fn test_generate_known_code() {
        // 16 codewords of 7 bits at distance 3 form the Hamming(7,4) code
        let book = Codebook::generate(16, 7, 3).unwrap();
        assert_eq!(
            book.codewords(),
            &[
                0x00, 0x07, 0x19, 0x1E, 0x2A, 0x2D, 0x33, 0x34, 0x4B, 0x4C, 0x52, 0x55, 0x61,
                0x66, 0x78, 0x7F
            ]
        );
    }

    #[test]
    fn test_generate_wide_code() {
        let book = Codebook::generate(16, 32, 7).unwrap();
        assert_eq!(book.len(), 16);
        assert_eq!(book.codeword(0), Some(0));
        assert_eq!(book.codeword(1), Some(0x7F));
        assert_eq!(book.codeword(15), Some(0x34CB));
        assert!(verify(book.codewords(), 32, 7));
    }

    #[test]
    fn test_generate_exhausted() {
        let err = Codebook::generate(5, 4, 3).unwrap_err();
        assert_eq!(
            err,
            FrameError::CodebookExhausted {
                requested: 5,
                found: 2,
                width: 4,
            }
        );
    }

    #[test]
    fn test_generate_rejects_zero_symbols() {
        assert!(Codebook::generate(0, 8, 3).is_err());
        assert!(Codebook::generate(4, 65, 3).is_err());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = Codebook::generate(16, 16, 7).unwrap();
        let b = Codebook::generate(16, 16, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_symbol_codebook() {
        let book = Codebook::generate(1, 8, 5).unwrap();
        assert_eq!(book.actual_min_distance(), None);
        assert_eq!(book.iter().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[quickcheck]
    fn prop_generated_codebooks_keep_distance(count: u8, width: u8, min_distance: u8) -> bool {
        let count = usize::from(count % 16) + 1;
        let width = u32::from(width % 12) + 1;
        let min_distance = u32::from(min_distance % 6);

        match Codebook::generate(count, width, min_distance) {
            Ok(book) => book.len() == count && verify(book.codewords(), width, min_distance),
            Err(FrameError::CodebookExhausted { found, .. }) => found < count,
            Err(_) => false,
        }
    }
}
