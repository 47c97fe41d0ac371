//! In-Memory MangaPage Repository

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::ports::{MangaPageRepositoryPort, RepositoryError};
use crate::domain::manga::{MangaPage, PageId};

/// 内存漫画页仓储
///
/// 每条记录附带递增序号，用于按插入顺序列出
pub struct InMemoryMangaPageRepository {
    pages: DashMap<PageId, (u64, MangaPage)>,
    next_seq: AtomicU64,
}

impl InMemoryMangaPageRepository {
    pub fn new() -> Self {
        Self {
            pages: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Default for InMemoryMangaPageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MangaPageRepositoryPort for InMemoryMangaPageRepository {
    async fn insert(&self, page: &MangaPage) -> Result<(), RepositoryError> {
        match self.pages.entry(*page.id()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(RepositoryError::Duplicate(
                format!("manga page {}", page.id()),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                slot.insert((seq, page.clone()));
                tracing::debug!(page_id = %page.id(), seq, "Manga page stored in memory");
                Ok(())
            }
        }
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<MangaPage>, RepositoryError> {
        // 先按序号截断，只克隆返回的页面（image_data 可能很大）
        let mut order: Vec<(u64, PageId)> = self
            .pages
            .iter()
            .map(|entry| (entry.value().0, *entry.key()))
            .collect();
        order.sort_unstable_by_key(|(seq, _)| *seq);
        order.truncate(limit);

        Ok(order
            .into_iter()
            .filter_map(|(_, id)| self.pages.get(&id).map(|entry| entry.value().1.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: &PageId) -> Result<Option<MangaPage>, RepositoryError> {
        Ok(self.pages.get(id).map(|entry| entry.value().1.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manga::PageTitle;

    fn page(title: &str) -> MangaPage {
        MangaPage::new(PageTitle::new(title).unwrap(), String::new(), Vec::new())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryMangaPageRepository::new();
        let stored = page("One");
        repo.insert(&stored).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.find_by_id(stored.id()).await.unwrap(), Some(stored));
        assert!(repo.find_by_id(&PageId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let repo = InMemoryMangaPageRepository::new();
        let stored = page("One");
        repo.insert(&stored).await.unwrap();
        assert!(matches!(
            repo.insert(&stored).await,
            Err(RepositoryError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repo = InMemoryMangaPageRepository::new();
        for title in ["z", "x", "y"] {
            repo.insert(&page(title)).await.unwrap();
        }

        let titles: Vec<String> = repo
            .find_all(10)
            .await
            .unwrap()
            .iter()
            .map(|p| p.title().to_string())
            .collect();
        assert_eq!(titles, vec!["z", "x", "y"]);
        assert_eq!(repo.find_all(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_all_limit_keeps_oldest_pages() {
        let repo = InMemoryMangaPageRepository::new();
        let mut ids = Vec::new();
        for i in 0..150 {
            let stored = page(&format!("page-{}", i));
            ids.push(*stored.id());
            repo.insert(&stored).await.unwrap();
        }

        let listed: Vec<PageId> = repo
            .find_all(100)
            .await
            .unwrap()
            .iter()
            .map(|p| *p.id())
            .collect();
        assert_eq!(listed, ids[..100].to_vec());
    }
}
