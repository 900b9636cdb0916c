//! Additive harmonic oscillator for a plucked-string timbre.

use std::f64::consts::PI;

/// Partial weights: fundamental plus the 2nd, 3rd and 4th harmonics.
pub const HARMONIC_WEIGHTS: [f64; 4] = [1.0, 0.5, 0.3, 0.2];

/// Sum of weighted sine partials at `phase` (fraction of a cycle).
pub fn harmonic_sum(phase: f64) -> f64 {
    HARMONIC_WEIGHTS
        .iter()
        .enumerate()
        .map(|(i, &weight)| weight * (2.0 * PI * (i + 1) as f64 * phase).sin())
        .sum()
}

/// A fixed-frequency phase accumulator driving [`harmonic_sum`].
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        Oscillator {
            frequency,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Phase increment per sample.
    fn phase_inc(&self) -> f64 {
        self.frequency / self.sample_rate
    }

    /// Move the phase forward by one sample, wrapping into [0, 1).
    pub fn advance(&mut self) {
        self.phase += self.phase_inc();
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
    }

    /// Current output value (does not advance).
    pub fn value(&self) -> f64 {
        harmonic_sum(self.phase)
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Reset oscillator phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
