//! Manga Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{MangaPageRepositoryPort, DEFAULT_LIST_LIMIT};
use crate::application::queries::{GetMangaPage, ListMangaPages};
use crate::domain::manga::{MangaPage, PageId};

/// GetMangaPage Handler
pub struct GetMangaPageHandler {
    page_repo: Arc<dyn MangaPageRepositoryPort>,
}

impl GetMangaPageHandler {
    pub fn new(page_repo: Arc<dyn MangaPageRepositoryPort>) -> Self {
        Self { page_repo }
    }

    /// 非 UUID 格式的 ID 不可能存在，直接按 NotFound 处理
    pub async fn handle(&self, query: GetMangaPage) -> Result<MangaPage, ApplicationError> {
        let Some(page_id) = PageId::parse(&query.page_id) else {
            return Err(ApplicationError::not_found("Manga page", query.page_id));
        };

        self.page_repo
            .find_by_id(&page_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Manga page", query.page_id))
    }
}

/// ListMangaPages Handler
pub struct ListMangaPagesHandler {
    page_repo: Arc<dyn MangaPageRepositoryPort>,
}

impl ListMangaPagesHandler {
    pub fn new(page_repo: Arc<dyn MangaPageRepositoryPort>) -> Self {
        Self { page_repo }
    }

    pub async fn handle(&self, query: ListMangaPages) -> Result<Vec<MangaPage>, ApplicationError> {
        let limit = query.limit.clamp(1, DEFAULT_LIST_LIMIT);
        Ok(self.page_repo.find_all(limit).await?)
    }
}
