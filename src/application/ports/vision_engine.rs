//! Vision Engine Port - 视觉模型抽象
//!
//! 输入图片 + 指令，返回模型的自由文本输出；解析由 domain 层负责

use async_trait::async_trait;
use thiserror::Error;

/// 视觉服务错误
#[derive(Debug, Clone, Error)]
pub enum VisionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Vision service not configured")]
    NotConfigured,
}

/// 视觉推理请求
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// 指令文本
    pub prompt: String,
    /// 图片 data-URI（`data:<mime>;base64,<payload>`）
    pub image_url: String,
}

/// Vision Engine Port
#[async_trait]
pub trait VisionEnginePort: Send + Sync {
    /// 执行图片理解，返回模型原始文本
    async fn analyze(&self, request: VisionRequest) -> Result<String, VisionError>;
}
