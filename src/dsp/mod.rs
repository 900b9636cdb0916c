//! DSP Engine — Pure Rust guitar synthesis.
//!
//! The same code runs inside a browser AudioWorklet (via WASM) and in
//! native hosts that drive [`engine::SynthEngine`] from their own audio
//! callback.

pub mod engine;
pub mod envelope;
pub mod fretboard;
pub mod mixer;
pub mod oscillator;
pub mod registry;
pub mod test_tone;
pub mod voice;
