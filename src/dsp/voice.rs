//! Voice — one sounding string: harmonic oscillator, envelope and damping.

use super::envelope::{Envelope, PLUCK};
use super::fretboard::fret_to_frequency;
use super::oscillator::Oscillator;

/// Amplitude below which a voice is considered inaudible.
pub const SILENCE_THRESHOLD: f64 = 0.001;

/// A single plucked string.
///
/// `amplitude` starts at the pluck strength and decays geometrically by
/// the damping coefficient every sample, independently of the envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    pub string_index: usize,
    pub oscillator: Oscillator,
    pub envelope: Envelope,
    amplitude: f64,
    elapsed: f64,
    sample_period: f64,
}

impl Voice {
    /// Pluck `string_index` at `fret` with the given initial amplitude.
    pub fn pluck(string_index: usize, fret: i32, amplitude: f64, sample_rate: f64) -> Self {
        let frequency = fret_to_frequency(string_index, fret);
        Voice {
            string_index,
            oscillator: Oscillator::new(frequency, sample_rate),
            envelope: PLUCK,
            amplitude,
            elapsed: 0.0,
            sample_period: 1.0 / sample_rate,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.oscillator.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Seconds since onset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Render one sample.
    ///
    /// Returns `None` when the voice has rung out (envelope at zero or
    /// amplitude under [`SILENCE_THRESHOLD`]); the caller retires it and
    /// it contributes nothing for this sample.
    pub fn next_sample(&mut self, damping: f64) -> Option<f64> {
        self.oscillator.advance();
        self.elapsed += self.sample_period;

        let env = self.envelope.level(self.elapsed);
        if env <= 0.0 || self.amplitude < SILENCE_THRESHOLD {
            return None;
        }

        let sample = self.oscillator.value() * env * self.amplitude;
        self.amplitude *= damping;

        // NaN or inf from a degenerate frequency: drop the voice, keep the engine running
        if sample.is_finite() { Some(sample) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::harmonic_sum;

    const SR: f64 = 48000.0;

    #[test]
    fn voice_produces_sound() {
        let mut v = Voice::pluck(0, 0, 0.8, SR);
        let mut has_nonzero = false;
        for _ in 0..4800 {
            if let Some(s) = v.next_sample(0.998) {
                if s.abs() > 0.001 {
                    has_nonzero = true;
                }
            }
        }
        assert!(has_nonzero, "Voice should produce non-zero output");
    }

    #[test]
    fn first_sample_uses_first_sample_period() {
        let mut v = Voice::pluck(0, 0, 0.8, SR);
        let s = v.next_sample(0.998).expect("fresh voice should sound");
        let expected = harmonic_sum(82.41 / SR) * PLUCK.level(1.0 / SR) * 0.8;
        assert!((s - expected).abs() < 1e-12, "Got {s}, expected {expected}");
        assert!(s > 0.0);
    }

    #[test]
    fn amplitude_decays_geometrically() {
        let damping = 0.999;
        let mut v = Voice::pluck(2, 3, 1.0, SR);
        for k in 1..=500 {
            v.next_sample(damping).expect("voice should still be live");
            let expected = damping.powi(k);
            assert!(
                (v.amplitude() - expected).abs() < 1e-9,
                "After {k} samples: {} vs {expected}",
                v.amplitude()
            );
        }
    }

    #[test]
    fn retires_when_amplitude_drops() {
        let mut v = Voice::pluck(1, 0, 0.8, SR);
        let mut samples = 0;
        while v.next_sample(0.9).is_some() {
            samples += 1;
            assert!(samples < 1000, "Voice should retire quickly at heavy damping");
        }
        assert!(v.amplitude() < SILENCE_THRESHOLD);
    }

    #[test]
    fn retires_after_release() {
        let mut v = Voice::pluck(5, 0, 1.0, SR);
        let mut samples = 0usize;
        while v.next_sample(1.0).is_some() {
            samples += 1;
        }
        let secs = samples as f64 / SR;
        assert!((secs - PLUCK.release).abs() < 2.0 / SR, "Retired after {secs}s");
    }

    #[test]
    fn zero_pluck_strength_retires_immediately() {
        let mut v = Voice::pluck(0, 0, 0.0, SR);
        assert!(v.next_sample(0.998).is_none());
    }

    #[test]
    fn invalid_fret_is_silent() {
        let mut v = Voice::pluck(3, -1, 1.0, SR);
        assert_eq!(v.frequency(), 0.0);
        for _ in 0..100 {
            assert_eq!(v.next_sample(0.998), Some(0.0));
        }
    }

    #[test]
    fn voice_output_range() {
        let mut v = Voice::pluck(5, 12, 1.0, SR);
        let bound: f64 = crate::dsp::oscillator::HARMONIC_WEIGHTS.iter().sum();
        while let Some(s) = v.next_sample(0.999) {
            assert!(s.abs() <= bound, "Voice output out of range: {s}");
        }
    }
}
