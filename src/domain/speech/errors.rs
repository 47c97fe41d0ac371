//! Speech Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SpeechError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    #[error("Speed must be between 0.25 and 4.0, got {0}")]
    SpeedOutOfRange(f32),
}
