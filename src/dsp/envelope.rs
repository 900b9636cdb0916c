//! ADSR Envelope — a pure function of time since note onset.
//!
//! Unlike a gated envelope there is no note-off: a plucked string
//! attacks, decays to the sustain level, then dies away on its own.

/// Piecewise envelope shape, all times in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level [0, 1].
    pub sustain: f64,
    /// Total ring time in seconds; the envelope is silent from here on.
    pub release: f64,
}

/// The plucked-string envelope used by every voice.
pub const PLUCK: Envelope = Envelope {
    attack: 0.002,
    decay: 0.1,
    sustain: 0.6,
    release: 3.0,
};

impl Default for Envelope {
    fn default() -> Self {
        PLUCK
    }
}

impl Envelope {
    /// Amplitude multiplier [0, 1] at `elapsed` seconds after onset.
    ///
    /// The ring-out segment is `sustain * exp(-2 * t / release)` using
    /// absolute elapsed time, so it starts slightly below `sustain` and
    /// drops to zero at `release`.
    pub fn level(&self, elapsed: f64) -> f64 {
        let decay_end = self.attack + self.decay;
        if elapsed < 0.0 {
            0.0
        } else if elapsed < self.attack {
            elapsed / self.attack
        } else if elapsed < decay_end {
            let progress = (elapsed - self.attack) / self.decay;
            1.0 - (1.0 - self.sustain) * progress
        } else if elapsed < self.release {
            self.sustain * (-2.0 * elapsed / self.release).exp()
        } else {
            0.0
        }
    }

    /// True once the envelope has rung out completely.
    pub fn is_finished(&self, elapsed: f64) -> bool {
        self.level(elapsed) <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        assert_eq!(PLUCK.level(0.0), 0.0);
        assert!(PLUCK.is_finished(0.0));
    }

    #[test]
    fn attack_reaches_one() {
        assert!((PLUCK.level(PLUCK.attack) - 1.0).abs() < 1e-12);
        assert!((PLUCK.level(PLUCK.attack / 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn continuous_across_attack_boundary() {
        let eps = 1e-9;
        let before = PLUCK.level(PLUCK.attack - eps);
        let after = PLUCK.level(PLUCK.attack + eps);
        assert!((before - after).abs() < 1e-5, "{before} vs {after}");
    }

    #[test]
    fn decay_reaches_sustain() {
        let eps = 1e-9;
        let end = PLUCK.attack + PLUCK.decay;
        let s = PLUCK.level(end - eps);
        assert!((s - PLUCK.sustain).abs() < 1e-6, "Should reach sustain, got {s}");
        let mid = PLUCK.level(PLUCK.attack + PLUCK.decay / 2.0);
        assert!((mid - 0.8).abs() < 1e-9, "Decay midpoint should be 0.8, got {mid}");
    }

    #[test]
    fn ring_out_uses_absolute_time() {
        let end = PLUCK.attack + PLUCK.decay;
        let expected = 0.6 * (-2.0 * end / 3.0_f64).exp();
        assert!((PLUCK.level(end) - expected).abs() < 1e-12);

        let t = 1.5;
        let expected = 0.6 * (-1.0_f64).exp();
        assert!((PLUCK.level(t) - expected).abs() < 1e-12);
    }

    #[test]
    fn silent_after_release() {
        assert_eq!(PLUCK.level(PLUCK.release), 0.0);
        assert_eq!(PLUCK.level(10.0), 0.0);
        assert!(PLUCK.is_finished(PLUCK.release));
        assert!(!PLUCK.is_finished(PLUCK.release - 0.001));
    }

    #[test]
    fn full_cycle_range() {
        let sr = 48000.0;
        for n in 0..(4.0 * sr) as usize {
            let s = PLUCK.level(n as f64 / sr);
            assert!((0.0..=1.0).contains(&s), "Envelope out of range: {s}");
        }
    }
}
