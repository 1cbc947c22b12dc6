//! hamcode - minimum-distance coding and parity frame tool
//!
//! Thin driver over the hamcode library crates: builds codebooks, runs
//! noisy channel simulations and round-trips 12-bit values through parity
//! frames.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use hamcode_core::channel::FlipCount;
use hamcode_frame::codebook::Codebook;
use hamcode_frame::parity::{decode_frame, decode_values, encode_values, ParityLayout, MAX_VALUE12};
use hamcode_frame::Symbol;
use hamcode_tools::{format_word, parse_number, parse_symbol_bits, CodebookMode, SimConfig, Simulation};

/// Symbol width accepted on the command line
const SYMBOL_BITS: usize = 4;

/// hamcode digital error-correction simulator
#[derive(Parser)]
#[command(name = "hamcode")]
#[command(about = "Minimum-distance codebooks, noisy channels and parity frames")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the configured codebook
    Verify(CodebookArgs),
    /// Generate a codebook by greedy search
    Generate(GenerateArgs),
    /// Encode, corrupt and decode 4-bit symbols
    Simulate(SimulateArgs),
    /// Parity frame encoding and decoding
    #[command(subcommand)]
    Frame(FrameCommand),
}

#[derive(Args, Clone)]
struct CodebookArgs {
    /// Codebook source
    #[arg(long, value_enum)]
    mode: Option<CodebookMode>,

    /// Number of symbols (generated mode)
    #[arg(long)]
    count: Option<usize>,

    /// Codeword width in bits (generated mode)
    #[arg(long)]
    width: Option<u32>,

    /// Minimum pairwise Hamming distance (generated mode)
    #[arg(long)]
    min_distance: Option<u32>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of symbols
    #[arg(long, default_value = "16")]
    count: usize,

    /// Codeword width in bits
    #[arg(long, default_value = "16")]
    width: u32,

    /// Minimum pairwise Hamming distance
    #[arg(long, default_value = "7")]
    min_distance: u32,
}

#[derive(Args)]
struct SimulateArgs {
    /// Symbols as 4-digit binary strings
    #[arg(default_values = ["1010", "1111", "0011", "11", "0", "101", "1011"])]
    symbols: Vec<String>,

    #[command(flatten)]
    codebook: CodebookArgs,

    /// RNG seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Channel sub-block width in bits
    #[arg(long)]
    block_width: Option<u32>,

    /// Maximum flips per sub-block
    #[arg(long)]
    max_flips: Option<u32>,

    /// Flip exactly --max-flips bits per block instead of a uniform draw
    #[arg(long)]
    exact_flips: bool,

    /// Draw the flip count uniformly from 0..=--max-flips
    #[arg(long, conflicts_with = "exact_flips")]
    uniform_flips: bool,
}

#[derive(Subcommand)]
enum FrameCommand {
    /// Encode 12-bit values (0x hex, 0b binary or decimal) into frames
    Encode {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Decode frame bytes back into 12-bit values
    Decode {
        #[arg(required = true)]
        bytes: Vec<String>,
    },
    /// Check single frames against a layout
    Check {
        /// Frame layout
        #[arg(long, value_enum, default_value = "nibble3")]
        layout: LayoutArg,

        #[arg(required = true)]
        bytes: Vec<String>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum LayoutArg {
    Nibble3,
    Nibble2,
}

impl From<LayoutArg> for ParityLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Nibble3 => ParityLayout::Nibble3,
            LayoutArg::Nibble2 => ParityLayout::Nibble2,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            SimConfig::from_file(path)
        }
        None => Ok(SimConfig::default()),
    }
}

fn apply_codebook_args(config: &mut SimConfig, args: &CodebookArgs) {
    if let Some(mode) = args.mode {
        config.codebook.mode = mode;
    }
    if let Some(count) = args.count {
        config.codebook.symbol_count = count;
    }
    if let Some(width) = args.width {
        config.codebook.width = width;
    }
    if let Some(min_distance) = args.min_distance {
        config.codebook.min_distance = min_distance;
    }
}

fn print_codebook(codebook: &Codebook, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(codebook)?);
        return Ok(());
    }

    for (symbol, word) in codebook.iter() {
        println!("  {:>4X}: {}", symbol, format_word(word, codebook.width()));
    }
    Ok(())
}

fn run_verify(config: &SimConfig, json: bool) -> Result<()> {
    let codebook = config.codebook.build()?;

    if json {
        let summary = serde_json::json!({
            "symbols": codebook.len(),
            "width": codebook.width(),
            "min_distance": codebook.min_distance(),
            "actual_min_distance": codebook.actual_min_distance(),
            "correctable_errors": codebook.correctable_errors(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("✓ Codebook OK: {} symbols, {} bits", codebook.len(), codebook.width());
    println!("  Declared minimum distance: {}", codebook.min_distance());
    match codebook.actual_min_distance() {
        Some(distance) => println!("  Actual minimum distance:   {}", distance),
        None => println!("  Actual minimum distance:   n/a (single codeword)"),
    }
    println!("  Correctable errors/word:   {}", codebook.correctable_errors());
    Ok(())
}

fn run_generate(args: &GenerateArgs, json: bool) -> Result<()> {
    info!(
        "Searching {} codewords of {} bits at distance {}",
        args.count, args.width, args.min_distance
    );
    let codebook = Codebook::generate(args.count, args.width, args.min_distance)?;

    if !json {
        println!(
            "Generated {} codewords ({} bits, D_min {}):",
            codebook.len(),
            codebook.width(),
            codebook.min_distance()
        );
    }
    print_codebook(&codebook, json)
}

fn run_simulate(mut config: SimConfig, args: &SimulateArgs, json: bool) -> Result<()> {
    apply_codebook_args(&mut config, &args.codebook);
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(block_width) = args.block_width {
        config.channel.block_width = block_width;
    }
    if let Some(max_flips) = args.max_flips {
        config.channel.max_flips_per_block = max_flips;
    }
    if args.exact_flips {
        config.channel.flip_count = FlipCount::Exact;
    } else if args.uniform_flips {
        config.channel.flip_count = FlipCount::Uniform;
    }

    let mut symbols: Vec<Symbol> = Vec::new();
    for input in &args.symbols {
        match parse_symbol_bits(input, SYMBOL_BITS) {
            Some(symbol) => symbols.push(symbol),
            None => warn!("Skipping {:?}: not a {}-bit binary symbol", input, SYMBOL_BITS),
        }
    }

    let mut simulation = Simulation::new(&config)?;
    let report = simulation.run(&symbols)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let width = report.width;
    for t in &report.transmissions {
        println!("\nSymbol:    {:X}", t.symbol);
        println!("Encoded:   {}", format_word(t.codeword, width));
        println!("Corrupted: {}  ({} bit errors)", format_word(t.received, width), t.bit_errors);
        let mark = if t.recovered { "✓" } else { "✗" };
        println!("Decoded:   {:X} {} (distance {})", t.decoded.symbol, mark, t.decoded.distance);
    }

    println!(
        "\n{} of {} symbols recovered, {} beyond the {}-error bound",
        report.recovered,
        report.transmissions.len(),
        report.beyond_bound,
        report.bound.correctable
    );
    if !report.bound.safe {
        println!(
            "Warning: channel worst case is {} errors per word, above the correction bound",
            report.bound.worst_case
        );
    }
    Ok(())
}

fn parse_values(inputs: &[String]) -> Result<Vec<u16>> {
    inputs
        .iter()
        .map(|input| -> Result<u16> {
            let value = parse_number(input)?;
            if value > u64::from(MAX_VALUE12) {
                anyhow::bail!("{:?} is not a 12-bit value (0..=4095)", input);
            }
            Ok(value as u16)
        })
        .collect()
}

fn parse_bytes(inputs: &[String]) -> Result<Vec<u8>> {
    inputs
        .iter()
        .map(|input| -> Result<u8> {
            // Bare 8-digit strings are frames written in binary
            let value = match parse_symbol_bits(input, 8) {
                Some(byte) => u64::from(byte),
                None => parse_number(input)?,
            };
            u8::try_from(value).with_context(|| format!("{:?} is not a byte", input))
        })
        .collect()
}

fn run_frame(command: &FrameCommand, json: bool) -> Result<()> {
    match command {
        FrameCommand::Encode { values } => {
            let values = parse_values(values)?;
            let frames = encode_values(&values)?;

            if json {
                println!("{}", serde_json::to_string(&frames)?);
            } else {
                let rendered: Vec<String> = frames.iter().map(|b| format!("{:08b}", b)).collect();
                println!("Encoded: {}", rendered.join(" "));
            }
        }
        FrameCommand::Decode { bytes } => {
            let frames = parse_bytes(bytes)?;
            let values = decode_values(&frames).context("Frame decoding failed")?;

            if json {
                println!("{}", serde_json::to_string(&values)?);
            } else {
                let rendered: Vec<String> = values.iter().map(|v| format!("{:03X}", v)).collect();
                println!("Decoded: {}", rendered.join(" "));
            }
        }
        FrameCommand::Check { layout, bytes } => {
            let layout = ParityLayout::from(*layout);
            for frame in parse_bytes(bytes)? {
                match decode_frame(frame, layout) {
                    Ok(payload) => println!("{:08b}: ✓ payload {:04b}", frame, payload),
                    Err(e) => println!("{:08b}: ✗ {}", frame, e),
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Verify(args) => {
            let mut config = config;
            apply_codebook_args(&mut config, args);
            run_verify(&config, cli.json)?;
        }
        Commands::Generate(args) => run_generate(args, cli.json)?,
        Commands::Simulate(args) => run_simulate(config, args, cli.json)?,
        Commands::Frame(command) => run_frame(command, cli.json)?,
    }

    Ok(())
}
