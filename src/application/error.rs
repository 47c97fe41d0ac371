//! 应用层错误定义
//!
//! 统一的命令/查询错误类型。视觉/TTS 服务错误不在此列：
//! 它们在 handler 内被降级为占位数据，不会传播到调用方。

use thiserror::Error;

use crate::domain::manga::MangaError;
use crate::domain::speech::SpeechError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 请求参数无效
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }
}

impl From<crate::application::ports::RepositoryError> for ApplicationError {
    fn from(err: crate::application::ports::RepositoryError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<MangaError> for ApplicationError {
    fn from(err: MangaError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
