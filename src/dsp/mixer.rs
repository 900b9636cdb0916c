//! Mixer — Loudness-normalizes the summed voices and clips to [-1, 1].

/// Output gain applied after polyphony normalization.
pub const MASTER_GAIN: f64 = 0.3;

/// Turns the raw sum of live voices into an output sample.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
}

impl Default for Mixer {
    fn default() -> Self {
        Mixer::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        Mixer {
            master_gain: MASTER_GAIN,
        }
    }

    /// Mix `sum` (the total of `live` voice contributions) down to one
    /// output sample.
    ///
    /// Dividing by `sqrt(live)` keeps six strings from being six times as
    /// loud as one. With no live voices the sum passes through untouched
    /// (it is zero anyway).
    pub fn mix(&self, sum: f64, live: usize) -> f64 {
        let normalized = if live > 0 {
            sum / (live as f64).sqrt() * self.master_gain
        } else {
            sum
        };
        hard_clip(normalized)
    }
}

/// Clamp to the valid PCM range. NaN collapses to silence.
pub fn hard_clip(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) }
}

/// Write a mono sample to every channel of an interleaved frame.
pub fn write_frame(frame: &mut [f32], sample: f64) {
    let s = sample as f32;
    frame.iter_mut().for_each(|out| *out = s);
}
