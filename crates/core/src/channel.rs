//! Bounded-noise channel simulation
//!
//! A word is cut into consecutive sub-blocks of `block_width` bits, most
//! significant block first. Every block independently receives a bounded
//! number of bit flips at distinct positions. The random source is always
//! supplied by the caller so that runs are reproducible under a fixed seed.

use crate::metric::{check_width, hamming_distance, mask, MAX_WIDTH};
use crate::{CoreError, Result, Word};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How many bits a block loses per transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipCount {
    /// Uniform draw from `0..=max_flips_per_block`
    Uniform,
    /// Always exactly `max_flips_per_block`
    Exact,
}

/// Channel noise parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Sub-block size in bits
    pub block_width: u32,
    /// Upper bound on flipped bits per sub-block
    pub max_flips_per_block: u32,
    /// Flip count model
    pub flip_count: FlipCount,
}

impl Default for ChannelConfig {
    /// Two flips in every byte
    fn default() -> Self {
        Self {
            block_width: 8,
            max_flips_per_block: 2,
            flip_count: FlipCount::Exact,
        }
    }
}

/// Comparison of a channel's worst case against a decoder's correction bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundCheck {
    /// Most bit errors the channel can put into one word
    pub worst_case: u32,
    /// Most bit errors the decoder is guaranteed to correct
    pub correctable: u32,
    /// True when `worst_case <= correctable`
    pub safe: bool,
}

impl ChannelConfig {
    /// Create a new channel configuration
    pub fn new(block_width: u32, max_flips_per_block: u32, flip_count: FlipCount) -> Self {
        Self {
            block_width,
            max_flips_per_block,
            flip_count,
        }
    }

    /// Check the parameters for consistency
    pub fn validate(&self) -> Result<()> {
        if self.block_width == 0 || self.block_width > MAX_WIDTH {
            return Err(CoreError::InvalidChannelConfig {
                msg: format!("Block width must be 1..={}, got {}", MAX_WIDTH, self.block_width),
            });
        }

        if self.max_flips_per_block > self.block_width {
            return Err(CoreError::InvalidChannelConfig {
                msg: format!(
                    "Cannot flip {} distinct bits in a {}-bit block",
                    self.max_flips_per_block, self.block_width
                ),
            });
        }

        Ok(())
    }

    /// Number of sub-blocks in a word of `word_width` bits
    pub fn blocks_in(&self, word_width: u32) -> Result<u32> {
        check_width(word_width).map_err(|_| CoreError::InvalidChannelConfig {
            msg: format!("Invalid word width: {}", word_width),
        })?;

        if self.block_width == 0 || word_width % self.block_width != 0 {
            return Err(CoreError::InvalidChannelConfig {
                msg: format!(
                    "Word width {} is not a multiple of block width {}",
                    word_width, self.block_width
                ),
            });
        }

        Ok(word_width / self.block_width)
    }

    /// Most bit errors the channel can introduce into one word
    pub fn worst_case_errors(&self, word_width: u32) -> Result<u32> {
        Ok(self.blocks_in(word_width)? * self.max_flips_per_block)
    }

    /// Compare the worst case against `correctable` errors per word
    pub fn bound_check(&self, word_width: u32, correctable: u32) -> Result<BoundCheck> {
        let worst_case = self.worst_case_errors(word_width)?;
        Ok(BoundCheck {
            worst_case,
            correctable,
            safe: worst_case <= correctable,
        })
    }
}

/// Word after passing through the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoisyWord {
    /// Corrupted bit pattern
    pub word: Word,
    /// Bits actually flipped
    pub bit_errors: u32,
}

/// Per-block bit flipping channel
#[derive(Debug, Clone)]
pub struct ChannelSimulator {
    config: ChannelConfig,
}

impl ChannelSimulator {
    /// Create a new channel simulator
    pub fn new(config: ChannelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Noise-free channel (useful as a baseline)
    pub fn noiseless(block_width: u32) -> Result<Self> {
        Self::new(ChannelConfig::new(block_width, 0, FlipCount::Exact))
    }

    /// Get the channel configuration
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Corrupt the low `word_width` bits of `word`
    pub fn corrupt<R: Rng + ?Sized>(&self, word: Word, word_width: u32, rng: &mut R) -> Result<NoisyWord> {
        let blocks = self.config.blocks_in(word_width)?;
        let block_width = self.config.block_width;
        let block_mask = mask(block_width);

        let mut noisy: Word = 0;
        for index in 0..blocks {
            let shift = word_width - (index + 1) * block_width;
            let block = (word >> shift) & block_mask;
            let flipped = block ^ self.flip_pattern(rng);
            noisy |= flipped << shift;
        }

        let word = word & mask(word_width);
        let bit_errors = hamming_distance(word, noisy, word_width);
        trace!("Channel flipped {} bits: {:#x} -> {:#x}", bit_errors, word, noisy);

        Ok(NoisyWord {
            word: noisy,
            bit_errors,
        })
    }

    /// Corrupt a single byte, e.g. a parity frame
    pub fn corrupt_byte<R: Rng + ?Sized>(&self, byte: u8, rng: &mut R) -> Result<u8> {
        let noisy = self.corrupt(Word::from(byte), 8, rng)?;
        Ok(noisy.word as u8)
    }

    /// Random XOR mask for one block
    fn flip_pattern<R: Rng + ?Sized>(&self, rng: &mut R) -> Word {
        let max = self.config.max_flips_per_block;
        let count = match self.config.flip_count {
            FlipCount::Exact => max,
            FlipCount::Uniform => rng.gen_range(0..=max),
        };

        if count == 0 {
            return 0;
        }

        rand::seq::index::sample(rng, self.config.block_width as usize, count as usize)
            .iter()
            .fold(0, |pattern: Word, pos| pattern | ((1 as Word) << pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn block_errors(a: Word, b: Word, word_width: u32, block_width: u32) -> Vec<u32> {
        (0..word_width / block_width)
            .map(|i| {
                let shift = word_width - (i + 1) * block_width;
                hamming_distance(a >> shift, b >> shift, block_width)
            })
            .collect()
    }

    #[test]
    fn test_channel_config_validation() {
        assert!(ChannelConfig::default().validate().is_ok());
        assert!(ChannelConfig::new(0, 0, FlipCount::Exact).validate().is_err());
        assert!(ChannelConfig::new(65, 1, FlipCount::Exact).validate().is_err());
        assert!(ChannelConfig::new(4, 5, FlipCount::Uniform).validate().is_err());
        assert!(ChannelSimulator::new(ChannelConfig::new(8, 9, FlipCount::Exact)).is_err());
    }

    #[test]
    fn test_word_width_must_be_block_multiple() {
        let channel = ChannelSimulator::new(ChannelConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(channel.corrupt(0, 12, &mut rng).is_err());
        assert!(channel.corrupt(0, 0, &mut rng).is_err());
        assert!(channel.corrupt(0, 16, &mut rng).is_ok());
    }

    #[test]
    fn test_exact_flips_per_byte() {
        let channel = ChannelSimulator::new(ChannelConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..100 {
            let noisy = channel.corrupt(0xCCCC_CCCC, 32, &mut rng).unwrap();
            assert_eq!(noisy.bit_errors, 8);
            assert_eq!(block_errors(0xCCCC_CCCC, noisy.word, 32, 8), vec![2, 2, 2, 2]);
        }
    }

    #[test]
    fn test_noiseless_channel() {
        let channel = ChannelSimulator::noiseless(8).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let noisy = channel.corrupt(0xDEAD_BEEF, 32, &mut rng).unwrap();
        assert_eq!(noisy.word, 0xDEAD_BEEF);
        assert_eq!(noisy.bit_errors, 0);
    }

    #[test]
    fn test_corruption_is_reproducible() {
        let config = ChannelConfig::new(8, 3, FlipCount::Uniform);
        let channel = ChannelSimulator::new(config).unwrap();

        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for word in [0u64, 0xFFFF, 0x1234_5678] {
            assert_eq!(
                channel.corrupt(word, 32, &mut a).unwrap(),
                channel.corrupt(word, 32, &mut b).unwrap()
            );
        }
    }

    #[test]
    fn test_high_bits_are_dropped() {
        let channel = ChannelSimulator::noiseless(8).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let noisy = channel.corrupt(0xFF_0000_00AB, 16, &mut rng).unwrap();
        assert_eq!(noisy.word, 0x00AB);
    }

    #[test]
    fn test_full_width_block_flips_every_bit() {
        let channel = ChannelSimulator::new(ChannelConfig::new(8, 8, FlipCount::Exact)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(channel.corrupt_byte(0xA5, &mut rng).unwrap(), 0x5A);
    }

    #[test]
    fn test_bound_check() {
        let config = ChannelConfig::default();
        // 2 flips x 4 bytes against a D_min = 7 code correcting 3
        let check = config.bound_check(32, 3).unwrap();
        assert_eq!(check.worst_case, 8);
        assert!(!check.safe);

        let gentle = ChannelConfig::new(16, 1, FlipCount::Uniform);
        let check = gentle.bound_check(32, 3).unwrap();
        assert_eq!(check.worst_case, 2);
        assert!(check.safe);
    }

    #[quickcheck]
    fn prop_flips_bounded_per_block(word: u32, seed: u64, max_flips: u8, uniform: bool) -> bool {
        let max_flips = u32::from(max_flips % 9);
        let flip_count = if uniform { FlipCount::Uniform } else { FlipCount::Exact };
        let channel = ChannelSimulator::new(ChannelConfig::new(8, max_flips, flip_count)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let noisy = channel.corrupt(u64::from(word), 32, &mut rng).unwrap();
        let errors = block_errors(u64::from(word), noisy.word, 32, 8);

        errors.iter().all(|&e| e <= max_flips)
            && (uniform || errors.iter().all(|&e| e == max_flips))
            && errors.iter().sum::<u32>() == noisy.bit_errors
    }
}
