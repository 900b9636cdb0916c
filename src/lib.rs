pub mod config;
pub mod control;
pub mod dsp;
pub mod error;
pub mod worklet;

pub use crate::config::EngineConfig;
pub use crate::control::{ControlMessage, ControlSender, StatusMessage};
pub use crate::dsp::engine::{AudioProcessor, EngineState, SynthEngine};
pub use crate::error::{Result, SynthError};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the guitar-synth-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: frequency in Hz of a fretboard position (0 when invalid).
#[wasm_bindgen]
pub fn fret_frequency(string_index: usize, fret: i32) -> f64 {
    dsp::fretboard::fret_to_frequency(string_index, fret)
}
