//! OpenAI Vision Client - 调用 Chat Completions 接口做图片理解
//!
//! 实现 VisionEnginePort trait
//!
//! 外部 API:
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [{"role": "user", "content": [text, image_url]}], "max_tokens": N}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::application::ports::{VisionEnginePort, VisionError, VisionRequest};

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI 视觉客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiVisionClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 最大输出 token
    pub max_tokens: u32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiVisionClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

impl OpenAiVisionClientConfig {
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

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// OpenAI 视觉客户端
pub struct OpenAiVisionClient {
    client: Client,
    config: OpenAiVisionClientConfig,
}

impl OpenAiVisionClient {
    /// 创建新的视觉客户端
    pub fn new(config: OpenAiVisionClientConfig) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VisionError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn request_body(&self, request: &VisionRequest) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": request.prompt},
                        {"type": "image_url", "image_url": {"url": request.image_url}}
                    ]
                }
            ],
            "max_tokens": self.config.max_tokens
        })
    }
}

#[async_trait]
impl VisionEnginePort for OpenAiVisionClient {
    async fn analyze(&self, request: VisionRequest) -> Result<String, VisionError> {
        if self.config.api_key.trim().is_empty() {
            return Err(VisionError::NotConfigured);
        }

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            image_url_len = request.image_url.len(),
            "Sending vision request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Timeout
                } else if e.is_connect() {
                    VisionError::NetworkError(format!("Cannot connect to vision service: {}", e))
                } else {
                    VisionError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VisionError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(format!("Failed to decode response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| VisionError::InvalidResponse("Response has no message content".to_string()))?;

        tracing::info!(
            model = %self.config.model,
            content_len = content.len(),
            "Vision analysis completed"
        );

        Ok(content)
    }
}
