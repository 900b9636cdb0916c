//! Engine configuration with documented defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthError};

pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;
pub const DEFAULT_PLUCK_STRENGTH: f64 = 0.8;
pub const DEFAULT_STRING_DAMPING: f64 = 0.998;
/// Room for a burst of UI events between two render blocks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

pub const MIN_STRING_DAMPING: f64 = 0.9;
pub const MAX_STRING_DAMPING: f64 = 0.999;

/// Startup configuration for a [`SynthEngine`](crate::dsp::engine::SynthEngine).
///
/// Deserializes from a camelCase JSON options object; missing keys take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Host sample rate in Hz, fixed for the engine's lifetime.
    pub sample_rate: f64,
    /// Initial amplitude of newly plucked strings [0, 1].
    pub pluck_strength: f64,
    /// Per-sample amplitude multiplier [0.9, 0.999].
    pub string_damping: f64,
    /// Capacity of the control -> render command queue.
    pub queue_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            pluck_strength: DEFAULT_PLUCK_STRENGTH,
            string_damping: DEFAULT_STRING_DAMPING,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(sample_rate: f64) -> Self {
        EngineConfig {
            sample_rate,
            ..Default::default()
        }
    }

    /// Parse a JSON options object such as `{"sampleRate": 44100}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SynthError::InvalidConfig(e.to_string()))
    }

    /// Check hard requirements and clamp the soft ones.
    ///
    /// Pluck strength and damping are clamped into range, the same way
    /// their runtime setters behave.
    pub fn validate(mut self) -> Result<Self> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(SynthError::InvalidSampleRate(self.sample_rate));
        }
        if self.queue_capacity == 0 {
            return Err(SynthError::InvalidQueueCapacity);
        }
        self.pluck_strength = clamp_pluck_strength(self.pluck_strength);
        self.string_damping = clamp_string_damping(self.string_damping);
        Ok(self)
    }
}

/// Clamp to [0, 1]; NaN becomes 0.
pub fn clamp_pluck_strength(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

/// Clamp to [0.9, 0.999]; NaN becomes the lower bound.
pub fn clamp_string_damping(x: f64) -> f64 {
    if x.is_nan() {
        MIN_STRING_DAMPING
    } else {
        x.clamp(MIN_STRING_DAMPING, MAX_STRING_DAMPING)
    }
}
