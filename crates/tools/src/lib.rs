//! hamcode tools library

pub mod config;
pub mod common;
pub mod simulate;

pub use config::{CodebookConfig, CodebookMode, SimConfig};
pub use common::{format_word, parse_number, parse_symbol_bits};
pub use simulate::{Simulation, SimulationReport, Transmission};
