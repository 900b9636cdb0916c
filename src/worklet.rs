//! WASM façade for a browser AudioWorklet.
//!
//! The worklet's `process()` calls [`GuitarAudioProcessor::process_audio`];
//! its `port.onmessage` forwards UI messages to `post_message`. Every
//! control call goes through the command queue, so changes land at the
//! start of the next block.

use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::control::{ControlMessage, ControlSender};
use crate::dsp::engine::{AudioProcessor, SynthEngine};
use crate::error::SynthError;

fn to_js(e: SynthError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

#[wasm_bindgen]
pub struct GuitarAudioProcessor {
    engine: SynthEngine,
    tx: ControlSender,
}

#[wasm_bindgen]
impl GuitarAudioProcessor {
    /// `options` is an optional JSON object, e.g. `{"pluckStrength": 0.6}`.
    /// The `sample_rate` argument always wins over one given in options.
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f64, options: Option<String>) -> Result<GuitarAudioProcessor, JsValue> {
        let mut config = match options.as_deref() {
            Some(json) => EngineConfig::from_json(json).map_err(to_js)?,
            None => EngineConfig::default(),
        };
        config.sample_rate = sample_rate;
        let (engine, tx) = SynthEngine::new(config).map_err(to_js)?;
        Ok(GuitarAudioProcessor { engine, tx })
    }

    /// Render one mono block.
    pub fn process_audio(&mut self, output: &mut [f32]) {
        self.engine.render_mono(output);
    }

    /// Render one block of interleaved frames.
    pub fn process_interleaved(&mut self, output: &mut [f32], channels: usize) {
        self.engine.render_block(output, channels);
    }

    /// Forward a message object from the worklet port. Messages that fail
    /// to decode are logged and dropped.
    pub fn post_message(&mut self, message: JsValue) -> Result<(), JsValue> {
        match ControlMessage::from_js(message) {
            Ok(msg) => self.tx.send(msg).map_err(to_js),
            Err(e) => {
                log::warn!("Ignoring control message: {e}");
                Ok(())
            }
        }
    }

    /// The one-time `{"type": "ready", ...}` notification, then `null`.
    pub fn poll_status(&mut self) -> Result<JsValue, JsValue> {
        match self.engine.take_ready() {
            Some(status) => serde_wasm_bindgen::to_value(&status).map_err(|e| to_js(e.into())),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn play_chord(&mut self, fret_positions: &[i32]) -> Result<(), JsValue> {
        self.send(ControlMessage::chord(fret_positions))
    }

    pub fn play_note(&mut self, string_index: usize, fret: i32) -> Result<(), JsValue> {
        self.send(ControlMessage::PlayNote { string_index, fret })
    }

    pub fn stop_all(&mut self) -> Result<(), JsValue> {
        self.send(ControlMessage::StopAll)
    }

    pub fn set_pluck_strength(&mut self, strength: f32) -> Result<(), JsValue> {
        self.send(ControlMessage::SetPluckStrength {
            strength: strength as f64,
        })
    }

    pub fn set_string_damping(&mut self, damping: f32) -> Result<(), JsValue> {
        self.send(ControlMessage::SetStringDamping {
            damping: damping as f64,
        })
    }

    pub fn enable_test_tone(&mut self) -> Result<(), JsValue> {
        self.send(ControlMessage::EnableTestTone)
    }

    pub fn disable_test_tone(&mut self) -> Result<(), JsValue> {
        self.send(ControlMessage::DisableTestTone)
    }

    #[wasm_bindgen(getter)]
    pub fn sample_rate(&self) -> f64 {
        self.engine.sample_rate()
    }

    #[wasm_bindgen(getter)]
    pub fn active_voices(&self) -> usize {
        self.engine.active_voices()
    }
}

impl GuitarAudioProcessor {
    fn send(&mut self, msg: ControlMessage) -> Result<(), JsValue> {
        self.tx.send(msg).map_err(to_js)
    }
}
