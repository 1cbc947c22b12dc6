//! Input parsing and output formatting shared by the tools

use anyhow::{Context, Result};
use hamcode_core::metric::mask;
use hamcode_core::Word;

/// Parse a symbol written as exactly `bits` binary digits
///
/// Returns `None` for anything else, including shorter strings such as
/// `"11"` for a 4-bit symbol.
pub fn parse_symbol_bits(input: &str, bits: usize) -> Option<u32> {
    let input = input.trim();
    if input.len() != bits || !input.chars().all(|c| c == '0' || c == '1') {
        return None;
    }
    u32::from_str_radix(input, 2).ok()
}

/// Parse a number with an optional `0x` (hex) or `0b` (binary) prefix
///
/// Bare digits are decimal.
pub fn parse_number(input: &str) -> Result<u64> {
    let input = input.trim().replace('_', "");
    let (digits, radix) = if let Some(hex) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = input.strip_prefix("0b").or_else(|| input.strip_prefix("0B")) {
        (bin, 2)
    } else {
        (input.as_str(), 10)
    };

    u64::from_str_radix(digits, radix)
        .with_context(|| format!("Invalid number: {:?}", input))
}

/// Render the low `width` bits as binary, one space between bytes
///
/// The first group is shorter when `width` is not a multiple of 8.
pub fn format_word(word: Word, width: u32) -> String {
    let digits = format!("{:0width$b}", word & mask(width), width = width as usize);
    let lead = digits.len() % 8;

    let mut out = String::with_capacity(digits.len() + digits.len() / 8);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 8 - lead) % 8 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
