//! Diagnostic test tone: a quiet 440 Hz sine that bypasses the voices.

use std::f64::consts::PI;

pub const TEST_TONE_FREQUENCY: f64 = 440.0;
pub const TEST_TONE_GAIN: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct TestTone {
    active: bool,
    phase: f64,
    phase_inc: f64,
}

impl TestTone {
    pub fn new(sample_rate: f64) -> Self {
        TestTone {
            active: false,
            phase: 0.0,
            phase_inc: TEST_TONE_FREQUENCY / sample_rate,
        }
    }

    /// Turn the tone on, restarting it from phase zero.
    pub fn enable(&mut self) {
        self.active = true;
        self.phase = 0.0;
    }

    pub fn disable(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn next_sample(&mut self) -> f64 {
        let sample = (2.0 * PI * self.phase).sin() * TEST_TONE_GAIN;
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}
