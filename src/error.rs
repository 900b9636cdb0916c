use thiserror::Error;

/// Errors raised on the control side of the synthesizer.
///
/// The render path never produces these; it degrades to silence instead.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Invalid sample rate {0}: must be finite and positive")]
    InvalidSampleRate(f64),
    #[error("Command queue capacity must be at least 1")]
    InvalidQueueCapacity,
    #[error("Command queue is full; message dropped")]
    QueueFull,
    #[error("Could not decode control message: {0}")]
    Decode(String),
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for SynthError {
    fn from(e: serde_json::Error) -> Self {
        SynthError::Decode(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for SynthError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        SynthError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
