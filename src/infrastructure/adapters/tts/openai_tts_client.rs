//! OpenAI TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 TtsEnginePort trait，通过 HTTP 调用 OpenAI 语音合成接口
//!
//! 外部 TTS API:
//! POST {base_url}/audio/speech
//! Request: {"model": "tts-1", "input": "...", "voice": "alloy", "speed": 1.0, "response_format": "mp3"}
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{TtsEnginePort, TtsError};
use crate::domain::speech::{AudioFormat, SpeechRequest};

/// TTS 请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeechHttpRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'static str,
    speed: f32,
    response_format: &'static str,
}

/// OpenAI TTS 客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiTtsClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "tts-1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl OpenAiTtsClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model;
        }
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenAI TTS 客户端
pub struct OpenAiTtsClient {
    client: Client,
    config: OpenAiTtsClientConfig,
}

impl OpenAiTtsClient {
    /// 创建新的 TTS 客户端
    pub fn new(config: OpenAiTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TtsEnginePort for OpenAiTtsClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError> {
        if self.config.api_key.trim().is_empty() {
            return Err(TtsError::NotConfigured);
        }

        let http_request = SpeechHttpRequest {
            model: &self.config.model,
            input: request.text.as_str(),
            voice: request.voice.as_str(),
            speed: request.speed.value(),
            response_format: AudioFormat::Mp3.as_str(),
        };

        tracing::debug!(
            url = %self.speech_url(),
            text_len = http_request.input.len(),
            voice = %http_request.voice,
            "Sending TTS request"
        );

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&http_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio_data = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(
            model = %self.config.model,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenAiTtsClientConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "tts-1");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiTtsClientConfig::new("http://example.com:9000/v1", "sk-test")
            .with_model("tts-1-hd")
            .with_timeout(30);
        assert_eq!(config.base_url, "http://example.com:9000/v1");
        assert_eq!(config.model, "tts-1-hd");
        assert_eq!(config.timeout_secs, 30);

        let client = OpenAiTtsClient::new(config).unwrap();
        assert_eq!(client.speech_url(), "http://example.com:9000/v1/audio/speech");
    }

    #[test]
    fn test_request_body_shape() {
        let request = SpeechRequest::parse("Hello".to_string(), Some("echo"), Some(1.25)).unwrap();
        let body = serde_json::to_value(SpeechHttpRequest {
            model: "tts-1",
            input: request.text.as_str(),
            voice: request.voice.as_str(),
            speed: request.speed.value(),
            response_format: "mp3",
        })
        .unwrap();

        assert_eq!(body["input"], "Hello");
        assert_eq!(body["voice"], "echo");
        assert_eq!(body["speed"], 1.25);
        assert_eq!(body["response_format"], "mp3");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let client = OpenAiTtsClient::new(OpenAiTtsClientConfig::default()).unwrap();
        let request = SpeechRequest::parse("Hello".to_string(), None, None).unwrap();
        assert!(matches!(
            client.synthesize(&request).await,
            Err(TtsError::NotConfigured)
        ));
    }
}
