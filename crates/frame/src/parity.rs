//! Parity-checked single-byte frames
//!
//! Each frame carries one 4-bit payload between fixed marker bits, followed
//! by a parity field holding the XOR fold of everything before it:
//!
//! ```text
//! Nibble3:  7   6 5 4 3   2 1 0
//!           1   p p p p   c c c      c = parity of bits 7..=3
//!
//! Nibble2:  7   6 5 4 3   2   1 0
//!           1   p p p p   0   c c    c = parity of bits 7..=2
//! ```
//!
//! The fold is a single bit, so the upper bits of the parity field are
//! always zero and are checked like any other bit. Frames only detect
//! corruption; a failed check is final for that frame.
//!
//! A 12-bit value travels as three `Nibble3` frames, most significant
//! nibble first.

use crate::{FrameError, Result};
use hamcode_core::metric::{bit, parity};
use hamcode_core::Word;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PAYLOAD_SHIFT: u32 = 3;
const PAYLOAD_MASK: u8 = 0x0F;
const PAYLOAD_BITS: u32 = 4;

/// Frames per 12-bit value
pub const FRAMES_PER_VALUE: usize = 3;

/// Largest value carried by [`encode_value12`]
pub const MAX_VALUE12: u16 = 0x0FFF;

/// Bit layout of a parity frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParityLayout {
    /// Marker, payload, 3-bit parity field over 5 checked bits
    #[default]
    Nibble3,
    /// Marker, payload, zero marker, 2-bit parity field over 6 checked bits
    Nibble2,
}

impl ParityLayout {
    /// Width of the trailing parity field
    pub const fn parity_bits(self) -> u32 {
        match self {
            ParityLayout::Nibble3 => 3,
            ParityLayout::Nibble2 => 2,
        }
    }

    /// Bits covered by the parity function, markers included
    pub const fn checked_bits(self) -> u32 {
        8 - self.parity_bits()
    }

    /// `(position, value)` of every fixed marker bit
    pub fn fixed_bits(self) -> &'static [(u32, u8)] {
        match self {
            ParityLayout::Nibble3 => &[(7, 1)],
            ParityLayout::Nibble2 => &[(7, 1), (2, 0)],
        }
    }

    fn parity_mask(self) -> u8 {
        (1 << self.parity_bits()) - 1
    }

    /// XOR fold of the checked prefix
    fn parity_of(self, frame: u8) -> u8 {
        parity(Word::from(frame >> self.parity_bits()))
    }
}

/// Build a frame around a 4-bit payload
pub fn encode_frame(payload: u8, layout: ParityLayout) -> Result<u8> {
    if payload > PAYLOAD_MASK {
        return Err(FrameError::InvalidValueRange {
            value: u64::from(payload),
            bits: PAYLOAD_BITS,
        });
    }

    let mut frame = payload << PAYLOAD_SHIFT;
    for &(position, value) in layout.fixed_bits() {
        frame |= value << position;
    }

    Ok(frame | layout.parity_of(frame))
}

/// Check a frame and extract its payload
pub fn decode_frame(frame: u8, layout: ParityLayout) -> Result<u8> {
    for &(position, value) in layout.fixed_bits() {
        if bit(Word::from(frame), position) != value {
            debug!("Frame {:#010b}: fixed bit {} is not {}", frame, position, value);
            return Err(FrameError::StructuralMismatch {
                frame,
                bit: position,
            });
        }
    }

    let expected = layout.parity_of(frame);
    let actual = frame & layout.parity_mask();
    if actual != expected {
        debug!(
            "Frame {:#010b}: parity {:#b}, expected {:#b}",
            frame, actual, expected
        );
        return Err(FrameError::ParityMismatch {
            frame,
            expected,
            actual,
        });
    }

    Ok((frame >> PAYLOAD_SHIFT) & PAYLOAD_MASK)
}

/// Split a 12-bit value into three frames, most significant nibble first
pub fn encode_value12(value: u16) -> Result<[u8; FRAMES_PER_VALUE]> {
    if value > MAX_VALUE12 {
        return Err(FrameError::InvalidValueRange {
            value: u64::from(value),
            bits: 12,
        });
    }

    let nibble = |shift: u16| ((value >> shift) & 0xF) as u8;
    Ok([
        encode_frame(nibble(8), ParityLayout::Nibble3)?,
        encode_frame(nibble(4), ParityLayout::Nibble3)?,
        encode_frame(nibble(0), ParityLayout::Nibble3)?,
    ])
}

/// Join three frames back into a 12-bit value
///
/// Fails on the first frame that does not check out.
pub fn decode_value12(frames: &[u8]) -> Result<u16> {
    if frames.len() != FRAMES_PER_VALUE {
        return Err(FrameError::SizeMismatch {
            expected: FRAMES_PER_VALUE,
            actual: frames.len(),
        });
    }

    frames.iter().try_fold(0u16, |value, &frame| -> Result<u16> {
        let nibble = decode_frame(frame, ParityLayout::Nibble3)?;
        Ok((value << PAYLOAD_BITS) | u16::from(nibble))
    })
}

/// Encode a sequence of 12-bit values back to back
pub fn encode_values(values: &[u16]) -> Result<Vec<u8>> {
    let mut frames = Vec::with_capacity(values.len() * FRAMES_PER_VALUE);
    for &value in values {
        frames.extend_from_slice(&encode_value12(value)?);
    }
    Ok(frames)
}

/// Decode a byte stream produced by [`encode_values`]
pub fn decode_values(frames: &[u8]) -> Result<Vec<u16>> {
    if frames.len() % FRAMES_PER_VALUE != 0 {
        return Err(FrameError::SizeMismatch {
            expected: (frames.len() / FRAMES_PER_VALUE + 1) * FRAMES_PER_VALUE,
            actual: frames.len(),
        });
    }

    frames
        .chunks_exact(FRAMES_PER_VALUE)
        .map(decode_value12)
        .collect()
}

/// Parity frame codec bound to one layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParityFrame {
    layout: ParityLayout,
}

impl ParityFrame {
    /// Create a new parity frame codec
    pub fn new(layout: ParityLayout) -> Self {
        Self { layout }
    }

    /// Get the layout
    pub fn layout(&self) -> ParityLayout {
        self.layout
    }

    /// Encode one payload nibble
    pub fn encode(&self, payload: u8) -> Result<u8> {
        encode_frame(payload, self.layout)
    }

    /// Check one frame and return its payload
    pub fn decode(&self, frame: u8) -> Result<u8> {
        decode_frame(frame, self.layout)
    }

    /// True if the frame passes every check
    pub fn is_valid(&self, frame: u8) -> bool {
        self.decode(frame).is_ok()
    }
}
