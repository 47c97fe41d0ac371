//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义 TTS 推理的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::speech::SpeechRequest;

/// TTS 错误
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("TTS service not configured")]
    NotConfigured,
}

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行语音合成，返回 MP3 编码的音频字节
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError>;
}
