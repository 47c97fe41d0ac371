//! Fake TTS Client - 不调用外部服务的 TTS 客户端
//!
//! 返回固定音频或固定错误，不实际调用 TTS 服务

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{TtsEnginePort, TtsError};
use crate::domain::speech::SpeechRequest;

/// Fake TTS Client
pub struct FakeTtsClient {
    result: Result<Vec<u8>, TtsError>,
    delay: Option<Duration>,
    last_request: Mutex<Option<SpeechRequest>>,
}

impl FakeTtsClient {
    /// 始终返回指定音频
    pub fn responding(audio: Vec<u8>) -> Self {
        Self {
            result: Ok(audio),
            delay: None,
            last_request: Mutex::new(None),
        }
    }

    /// 始终返回指定错误
    pub fn failing(error: TtsError) -> Self {
        Self {
            result: Err(error),
            delay: None,
            last_request: Mutex::new(None),
        }
    }

    /// 未配置 TTS 服务
    pub fn unavailable() -> Self {
        Self::failing(TtsError::NotConfigured)
    }

    /// 模拟推理延迟
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn last_request(&self) -> Option<SpeechRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError> {
        tracing::debug!(
            text_len = request.text.as_str().len(),
            voice = %request.voice,
            "FakeTtsClient: returning fixed audio"
        );

        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.result.clone()
    }
}
