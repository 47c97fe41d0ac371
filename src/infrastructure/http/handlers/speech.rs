//! Speech HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::Arc;

use crate::application::{GenerateSpeech, SpeechOutcome};
use crate::infrastructure::http::dto::{GenerateSpeechRequest, GenerateSpeechResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// POST /api/generate-speech
///
/// TTS 不可用时返回空 `audio_data` 和说明 `message`
pub async fn generate_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateSpeechRequest>, JsonRejection>,
) -> Result<Json<GenerateSpeechResponse>, ApiError> {
    let Json(req) = payload?;

    let command = GenerateSpeech {
        text: req.text,
        voice: req.voice,
        speed: req.speed,
    };
    let result = state.generate_speech_handler.handle(command).await?;

    let (audio_data, message) = match result.outcome {
        SpeechOutcome::Synthesized { audio } => (BASE64.encode(audio), None),
        SpeechOutcome::Unavailable { message } => (String::new(), Some(message)),
    };

    Ok(Json(GenerateSpeechResponse {
        audio_data,
        format: result.format,
        message,
    }))
}
