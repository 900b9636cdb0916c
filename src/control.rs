//! Control messages and the lock-free queue that carries them to the
//! render thread.
//!
//! The UI side decodes and enqueues; the audio side drains the queue once
//! at the top of every block, so voices never change mid-block.
//!
//! ```ignore
//! let (engine, mut tx) = SynthEngine::new(EngineConfig::default())?;
//! tx.send(ControlMessage::PlayNote { string_index: 0, fret: 3 })?;
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use wasm_bindgen::JsValue;

use crate::dsp::fretboard::STRING_COUNT;
use crate::error::{Result, SynthError};

/// Fret value meaning "don't play this string".
pub const MUTED: i32 = -1;

/// One instruction for the synthesizer.
///
/// Wire form is a JSON object tagged on `"type"`, e.g.
/// `{"type": "playNote", "stringIndex": 2, "fret": 5}`. Types this engine
/// doesn't know decode to [`ControlMessage::Unknown`] and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ControlMessage {
    /// Replace every ringing string with a new chord. Negative frets are muted.
    PlayChord {
        #[serde(deserialize_with = "fret_positions")]
        fret_positions: [i32; STRING_COUNT],
    },
    /// Re-pluck a single string, leaving the others ringing.
    PlayNote { string_index: usize, fret: i32 },
    /// Silence everything immediately.
    StopAll,
    SetPluckStrength { strength: f64 },
    SetStringDamping { damping: f64 },
    #[serde(rename = "testTone")]
    EnableTestTone,
    #[serde(rename = "stopTestTone")]
    DisableTestTone,
    #[serde(other)]
    Unknown,
}

impl ControlMessage {
    /// Build a chord from any number of fret positions; strings beyond the
    /// slice are muted and extra entries are ignored.
    pub fn chord(frets: &[i32]) -> Self {
        ControlMessage::PlayChord {
            fret_positions: pad_frets(frets),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a message posted from JavaScript (`port.postMessage(...)`).
    pub fn from_js(value: JsValue) -> Result<Self> {
        Ok(serde_wasm_bindgen::from_value(value)?)
    }
}

fn pad_frets(frets: &[i32]) -> [i32; STRING_COUNT] {
    let mut padded = [MUTED; STRING_COUNT];
    for (slot, &fret) in padded.iter_mut().zip(frets) {
        *slot = fret;
    }
    padded
}

fn fret_positions<'de, D>(deserializer: D) -> std::result::Result<[i32; STRING_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let frets = Vec::<i32>::deserialize(deserializer)?;
    Ok(pad_frets(&frets))
}

/// Outbound notifications from the engine to its host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StatusMessage {
    /// Sent once after construction, before the first block.
    Ready { sample_rate: f64 },
}

/// Sending half of the command queue, owned by the control thread.
pub struct ControlSender {
    tx: rtrb::Producer<ControlMessage>,
}

impl ControlSender {
    /// Enqueue a message without blocking.
    pub fn send(&mut self, msg: ControlMessage) -> Result<()> {
        match self.tx.push(msg) {
            Ok(()) => {
                log::debug!("Queued {msg:?}");
                Ok(())
            }
            Err(rtrb::PushError::Full(dropped)) => {
                log::warn!("Command queue full, dropping {dropped:?}");
                Err(SynthError::QueueFull)
            }
        }
    }

    /// Decode a JSON message and enqueue it.
    pub fn send_json(&mut self, json: &str) -> Result<()> {
        let msg = ControlMessage::from_json(json).inspect_err(|e| log::warn!("{e}"))?;
        self.send(msg)
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Create a bounded command queue holding up to `capacity` messages.
pub fn command_channel(capacity: usize) -> Result<(ControlSender, rtrb::Consumer<ControlMessage>)> {
    if capacity == 0 {
        return Err(SynthError::InvalidQueueCapacity);
    }
    let (tx, rx) = rtrb::RingBuffer::new(capacity);
    Ok((ControlSender { tx }, rx))
}
