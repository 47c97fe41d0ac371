//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite / 内存）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::manga::{MangaPage, PageId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 列表查询的默认上限
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// MangaPage Repository Port
///
/// 存储后端自行负责并发控制，调用方不加锁
#[async_trait]
pub trait MangaPageRepositoryPort: Send + Sync {
    /// 插入漫画页
    async fn insert(&self, page: &MangaPage) -> Result<(), RepositoryError>;

    /// 按插入顺序获取漫画页，最多 `limit` 条
    async fn find_all(&self, limit: usize) -> Result<Vec<MangaPage>, RepositoryError>;

    /// 根据 ID 查找漫画页
    async fn find_by_id(&self, id: &PageId) -> Result<Option<MangaPage>, RepositoryError>;

    /// 释放底层资源（进程退出时调用）
    async fn close(&self) {}
}
