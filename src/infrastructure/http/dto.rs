//! Data Transfer Objects
//!
//! 对外 JSON 字段名保持 snake_case（`speech_bubbles`、`image_data`、`audio_data`）

use serde::{Deserialize, Serialize};

use crate::domain::manga::{PageId, SpeechBubble};
use crate::domain::speech::AudioFormat;

/// 通用消息响应
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ============================================================================
// Manga DTOs
// ============================================================================

/// 缺失字段按空字符串处理，由应用层校验并返回 400
#[derive(Debug, Deserialize)]
pub struct AnalyzeMangaRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_data: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeMangaResponse {
    pub id: PageId,
    pub speech_bubbles: Vec<SpeechBubble>,
    pub message: &'static str,
}

// ============================================================================
// Speech DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateSpeechRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSpeechResponse {
    /// base64 编码的音频，不可用时为空字符串
    pub audio_data: String,
    pub format: AudioFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
