//! Audio Engine — the real-time render loop.
//!
//! The engine owns the voice registry and the receiving end of the command
//! queue. Each block it applies every pending control message, then renders
//! sample by sample: advance voices, mix, clip, and duplicate the mono
//! result into each output channel. Nothing on this path allocates, locks,
//! or returns an error.

use crate::config::{EngineConfig, clamp_pluck_strength, clamp_string_damping};
use crate::control::{ControlMessage, ControlSender, StatusMessage, command_channel};
use crate::error::Result;

use super::fretboard::STRING_COUNT;
use super::mixer::{Mixer, write_frame};
use super::registry::VoiceRegistry;
use super::test_tone::TestTone;
use super::voice::Voice;

/// What a host audio callback needs from a synthesizer.
pub trait AudioProcessor {
    /// Fill `output` with interleaved frames of `channels` samples each.
    fn render_block(&mut self, output: &mut [f32], channels: usize);

    /// Apply a control message right now.
    fn handle_message(&mut self, msg: ControlMessage);
}

/// Engine-wide parameters adjustable at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    /// Initial amplitude of newly plucked strings [0, 1].
    pub pluck_strength: f64,
    /// Per-sample amplitude multiplier [0.9, 0.999].
    pub string_damping: f64,
}

impl From<&EngineConfig> for EngineState {
    fn from(config: &EngineConfig) -> Self {
        EngineState {
            pluck_strength: clamp_pluck_strength(config.pluck_strength),
            string_damping: clamp_string_damping(config.string_damping),
        }
    }
}

pub struct SynthEngine {
    sample_rate: f64,
    state: EngineState,
    voices: VoiceRegistry,
    mixer: Mixer,
    test_tone: TestTone,
    commands: rtrb::Consumer<ControlMessage>,
    ready: Option<StatusMessage>,
}

impl SynthEngine {
    /// Build an engine and the sender that controls it.
    pub fn new(config: EngineConfig) -> Result<(Self, ControlSender)> {
        let config = config.validate()?;
        let (tx, commands) = command_channel(config.queue_capacity)?;
        log::info!(
            "Synth engine ready: {} Hz, pluck {}, damping {}",
            config.sample_rate,
            config.pluck_strength,
            config.string_damping
        );
        let engine = SynthEngine {
            sample_rate: config.sample_rate,
            state: EngineState::from(&config),
            voices: VoiceRegistry::new(),
            mixer: Mixer::new(),
            test_tone: TestTone::new(config.sample_rate),
            commands,
            ready: Some(StatusMessage::Ready {
                sample_rate: config.sample_rate,
            }),
        };
        Ok((engine, tx))
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn voices(&self) -> &VoiceRegistry {
        &self.voices
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn test_tone_active(&self) -> bool {
        self.test_tone.is_active()
    }

    /// The one-time "ready" notification; `None` after the first call.
    pub fn take_ready(&mut self) -> Option<StatusMessage> {
        self.ready.take()
    }

    /// Apply every queued message. Called once at the top of each block.
    pub fn drain_commands(&mut self) {
        while let Ok(msg) = self.commands.pop() {
            self.handle_message(msg);
        }
    }

    /// Render a mono block.
    pub fn render_mono(&mut self, output: &mut [f32]) {
        self.render_block(output, 1);
    }

    fn pluck(&mut self, string_index: usize, fret: i32) {
        let voice = Voice::pluck(string_index, fret, self.state.pluck_strength, self.sample_rate);
        self.voices.insert(voice);
    }

    fn play_chord(&mut self, fret_positions: [i32; STRING_COUNT]) {
        self.voices.clear();
        for (string_index, fret) in fret_positions.into_iter().enumerate() {
            if fret >= 0 {
                self.pluck(string_index, fret);
            }
        }
    }

    fn next_sample(&mut self) -> f64 {
        if self.test_tone.is_active() {
            return self.test_tone.next_sample();
        }
        let (sum, live) = self.voices.next_sample(self.state.string_damping);
        self.mixer.mix(sum, live)
    }
}

impl AudioProcessor for SynthEngine {
    fn render_block(&mut self, output: &mut [f32], channels: usize) {
        self.drain_commands();
        if channels == 0 {
            return;
        }
        for frame in output.chunks_mut(channels) {
            let sample = self.next_sample();
            write_frame(frame, sample);
        }
    }

    fn handle_message(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::PlayChord { fret_positions } => self.play_chord(fret_positions),
            ControlMessage::PlayNote { string_index, fret } => self.pluck(string_index, fret),
            ControlMessage::StopAll => self.voices.clear(),
            ControlMessage::SetPluckStrength { strength } => {
                self.state.pluck_strength = clamp_pluck_strength(strength);
            }
            ControlMessage::SetStringDamping { damping } => {
                self.state.string_damping = clamp_string_damping(damping);
            }
            ControlMessage::EnableTestTone => self.test_tone.enable(),
            ControlMessage::DisableTestTone => self.test_tone.disable(),
            ControlMessage::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::PLUCK;
    use crate::dsp::oscillator::harmonic_sum;

    fn engine() -> (SynthEngine, ControlSender) {
        SynthEngine::new(EngineConfig::default()).expect("default config is valid")
    }

    #[test]
    fn ready_is_sent_once() {
        let (mut e, _tx) = engine();
        assert_eq!(e.take_ready(), Some(StatusMessage::Ready { sample_rate: 48000.0 }));
        assert_eq!(e.take_ready(), None);
    }

    #[test]
    fn rejects_invalid_sample_rate() {
        assert!(SynthEngine::new(EngineConfig::with_sample_rate(0.0)).is_err());
    }

    #[test]
    fn empty_engine_renders_silent() {
        let (mut e, _tx) = engine();
        let mut buf = [1.0f32; 256];
        e.render_block(&mut buf, 2);
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn single_note_first_sample() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::PlayNote { string_index: 0, fret: 0 });
        let mut buf = [0.0f32; 1];
        e.render_mono(&mut buf);

        let sr = 48000.0;
        let voice = harmonic_sum(82.41 / sr) * PLUCK.level(1.0 / sr) * 0.8;
        let expected = (voice * 0.3).clamp(-1.0, 1.0) as f32;
        assert!(buf[0].abs() > 0.0);
        assert!((buf[0] - expected).abs() < 1e-7, "Got {}, expected {expected}", buf[0]);
    }

    #[test]
    fn messages_apply_at_block_start() {
        let (mut e, mut tx) = engine();
        tx.send(ControlMessage::PlayNote { string_index: 4, fret: 2 }).unwrap();
        assert_eq!(e.active_voices(), 0, "Nothing applies before a block");
        let mut buf = [0.0f32; 64];
        e.render_mono(&mut buf);
        assert_eq!(e.active_voices(), 1);
        assert!(buf.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn play_note_replaces_same_string_only() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::chord(&[0, 2, 2, 1, 0, 0]));
        e.handle_message(ControlMessage::PlayNote { string_index: 3, fret: 5 });
        assert_eq!(e.active_voices(), 6);
        let v = e.voices().get(3).unwrap();
        assert_eq!(v.frequency(), crate::dsp::fretboard::fret_to_frequency(3, 5));
    }

    #[test]
    fn chord_replaces_registry() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::chord(&[0, 2, 2, 1, 0, 0]));
        e.handle_message(ControlMessage::chord(&[-1, 3, -1, -1, -1, 1]));
        assert_eq!(e.active_voices(), 2);
        assert!(e.voices().get(1).is_some());
        assert!(e.voices().get(5).is_some());
    }

    #[test]
    fn out_of_range_string_is_ignored() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::PlayNote { string_index: 9, fret: 0 });
        assert_eq!(e.active_voices(), 0);
    }

    #[test]
    fn setters_clamp() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::SetPluckStrength { strength: 1.7 });
        e.handle_message(ControlMessage::SetStringDamping { damping: 0.5 });
        assert_eq!(e.state().pluck_strength, 1.0);
        assert_eq!(e.state().string_damping, 0.9);
        e.handle_message(ControlMessage::SetPluckStrength { strength: -3.0 });
        e.handle_message(ControlMessage::SetStringDamping { damping: 2.0 });
        assert_eq!(e.state().pluck_strength, 0.0);
        assert_eq!(e.state().string_damping, 0.999);
    }

    #[test]
    fn pluck_strength_applies_to_new_voices() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::SetPluckStrength { strength: 0.25 });
        e.handle_message(ControlMessage::PlayNote { string_index: 2, fret: 0 });
        assert_eq!(e.voices().get(2).unwrap().amplitude(), 0.25);
    }

    #[test]
    fn unknown_message_changes_nothing() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::PlayNote { string_index: 1, fret: 1 });
        let before = e.state();
        e.handle_message(ControlMessage::Unknown);
        assert_eq!(e.state(), before);
        assert_eq!(e.active_voices(), 1);
    }

    #[test]
    fn channels_are_identical() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::chord(&[3, 2, 0, 0, 0, 3]));
        let mut buf = [0.0f32; 128 * 2];
        e.render_block(&mut buf, 2);
        for frame in buf.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn zero_channels_renders_nothing() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::EnableTestTone);
        let mut buf = [0.5f32; 8];
        e.render_block(&mut buf, 0);
        assert!(buf.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn voices_retire_after_ringing_out() {
        let (mut e, _tx) = engine();
        e.handle_message(ControlMessage::SetStringDamping { damping: 0.9 });
        e.handle_message(ControlMessage::chord(&[0, 0, 0, 0, 0, 0]));
        let mut buf = [0.0f32; 512];
        e.render_mono(&mut buf);
        assert_eq!(e.active_voices(), 0);
        assert_eq!(*buf.last().unwrap(), 0.0);
    }
}
