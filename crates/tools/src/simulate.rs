//! Encode, corrupt and decode runs over a configured codebook and channel

use anyhow::{Context, Result};
use hamcode_core::channel::{BoundCheck, ChannelSimulator};
use hamcode_core::Word;
use hamcode_frame::codebook::Codebook;
use hamcode_frame::codec::{CodewordDecoder, CodewordEncoder, Decoded, SymbolDecoder, SymbolEncoder};
use hamcode_frame::Symbol;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SimConfig;

/// One symbol through the channel
#[derive(Debug, Clone, Serialize)]
pub struct Transmission {
    pub symbol: Symbol,
    pub codeword: Word,
    pub received: Word,
    pub bit_errors: u32,
    pub decoded: Decoded,
    pub recovered: bool,
}

/// Summary of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub width: u32,
    pub min_distance: u32,
    pub bound: BoundCheck,
    pub transmissions: Vec<Transmission>,
    /// Symbols decoded correctly
    pub recovered: usize,
    /// Words that arrived with more errors than the decoder can guarantee
    pub beyond_bound: usize,
}

/// Simulation pipeline: encoder, channel, decoder
pub struct Simulation {
    encoder: CodewordEncoder,
    decoder: CodewordDecoder,
    channel: ChannelSimulator,
    bound: BoundCheck,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Create a new simulation from configuration
    pub fn new(config: &SimConfig) -> Result<Self> {
        let codebook = Arc::new(config.codebook.build()?);
        let channel = ChannelSimulator::new(config.channel)
            .context("Invalid channel configuration")?;

        let bound = config
            .channel
            .bound_check(codebook.width(), codebook.correctable_errors())
            .context("Channel does not fit the codeword width")?;

        if !bound.safe {
            warn!(
                "Channel can flip up to {} bits per word but the codebook only corrects {}; decodes may be silently wrong",
                bound.worst_case, bound.correctable
            );
        }

        let rng = match config.seed {
            Some(seed) => {
                debug!("Seeding channel RNG with {}", seed);
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            encoder: CodewordEncoder::new(codebook.clone()),
            decoder: CodewordDecoder::new(codebook),
            channel,
            bound,
            rng,
        })
    }

    /// Get the codebook
    pub fn codebook(&self) -> &Codebook {
        self.encoder.codebook()
    }

    /// Channel budget against the decoder bound
    pub fn bound(&self) -> BoundCheck {
        self.bound
    }

    /// Send one symbol through encoder, channel and decoder
    pub fn transmit(&mut self, symbol: Symbol) -> Result<Transmission> {
        let codeword = self.encoder.encode(symbol)?;
        let noisy = self
            .channel
            .corrupt(codeword, self.encoder.word_width(), &mut self.rng)?;
        let decoded = self.decoder.decode_detailed(noisy.word);

        let recovered = decoded.symbol == symbol;
        if !recovered {
            debug!(
                "Symbol {:#x} decoded as {:#x} after {} bit errors",
                symbol, decoded.symbol, noisy.bit_errors
            );
        }

        Ok(Transmission {
            symbol,
            codeword,
            received: noisy.word,
            bit_errors: noisy.bit_errors,
            decoded,
            recovered,
        })
    }

    /// Send every symbol and summarize
    pub fn run(&mut self, symbols: &[Symbol]) -> Result<SimulationReport> {
        let transmissions = symbols
            .iter()
            .map(|&symbol| self.transmit(symbol))
            .collect::<Result<Vec<_>>>()?;

        let recovered = transmissions.iter().filter(|t| t.recovered).count();
        let beyond_bound = transmissions
            .iter()
            .filter(|t| t.bit_errors > self.bound.correctable)
            .count();

        info!(
            "Recovered {} of {} symbols ({} beyond the correction bound)",
            recovered,
            transmissions.len(),
            beyond_bound
        );

        let codebook = self.codebook();
        Ok(SimulationReport {
            width: codebook.width(),
            min_distance: codebook.min_distance(),
            bound: self.bound,
            transmissions,
            recovered,
            beyond_bound,
        })
    }
}
