//! Fake Vision Client - 不调用外部服务的视觉客户端
//!
//! 返回预设文本或固定错误；未配置 API Key 时由 main 注入，测试中也用它驱动各种分支

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{VisionEnginePort, VisionError, VisionRequest};

/// Fake Vision Client
pub struct FakeVisionClient {
    result: Result<String, VisionError>,
    delay: Option<Duration>,
    last_request: Mutex<Option<VisionRequest>>,
}

impl FakeVisionClient {
    /// 始终返回指定文本
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
            delay: None,
            last_request: Mutex::new(None),
        }
    }

    /// 始终返回指定错误
    pub fn failing(error: VisionError) -> Self {
        Self {
            result: Err(error),
            delay: None,
            last_request: Mutex::new(None),
        }
    }

    /// 未配置视觉服务
    pub fn unavailable() -> Self {
        Self::failing(VisionError::NotConfigured)
    }

    /// 模拟推理延迟
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 最近一次收到的请求
    pub fn last_request(&self) -> Option<VisionRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl VisionEnginePort for FakeVisionClient {
    async fn analyze(&self, request: VisionRequest) -> Result<String, VisionError> {
        tracing::debug!(
            image_url_len = request.image_url.len(),
            "FakeVisionClient: returning scripted result"
        );

        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.result.clone()
    }
}
