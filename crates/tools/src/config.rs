//! Configuration management for hamcode tools

use anyhow::{Context, Result};
use clap::ValueEnum;
use hamcode_core::channel::ChannelConfig;
use hamcode_frame::codebook::Codebook;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the codebook comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CodebookMode {
    /// Built-in 16-symbol, 32-bit table
    Standard,
    /// Greedy search with the configured parameters
    Generated,
}

/// Codebook parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodebookConfig {
    pub mode: CodebookMode,
    pub symbol_count: usize,
    pub width: u32,
    pub min_distance: u32,
}

impl Default for CodebookConfig {
    fn default() -> Self {
        Self {
            mode: CodebookMode::Standard,
            symbol_count: 16,
            width: 32,
            min_distance: 7,
        }
    }
}

impl CodebookConfig {
    /// Build the configured codebook
    pub fn build(&self) -> Result<Codebook> {
        let codebook = match self.mode {
            CodebookMode::Standard => Codebook::standard(),
            CodebookMode::Generated => {
                Codebook::generate(self.symbol_count, self.width, self.min_distance)
                    .context("Failed to generate codebook")?
            }
        };
        Ok(codebook)
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed RNG seed; fresh entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub codebook: CodebookConfig,
    pub channel: ChannelConfig,
}

impl SimConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = toml::from_str(&content)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamcode_core::channel::FlipCount;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_serialization() {
        let config = SimConfig {
            seed: Some(1234),
            codebook: CodebookConfig {
                mode: CodebookMode::Generated,
                symbol_count: 16,
                width: 16,
                min_distance: 5,
            },
            channel: ChannelConfig::new(8, 1, FlipCount::Uniform),
        };

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = SimConfig::from_file(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            seed = 7

            [channel]
            flip_count = "uniform"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.codebook, CodebookConfig::default());
        assert_eq!(config.channel.block_width, 8);
        assert_eq!(config.channel.max_flips_per_block, 2);
        assert_eq!(config.channel.flip_count, FlipCount::Uniform);
    }

    #[test]
    fn test_build_codebooks() {
        let standard = CodebookConfig::default().build().unwrap();
        assert_eq!(standard, Codebook::standard());

        let generated = CodebookConfig {
            mode: CodebookMode::Generated,
            symbol_count: 16,
            width: 7,
            min_distance: 3,
        };
        assert_eq!(generated.build().unwrap().len(), 16);

        let impossible = CodebookConfig {
            symbol_count: 5,
            width: 4,
            ..generated
        };
        assert!(impossible.build().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(SimConfig::from_file(Path::new("/nonexistent/hamcode.toml")).is_err());
    }
}
