//! Manga Queries

use crate::application::ports::DEFAULT_LIST_LIMIT;

/// 获取漫画页详情查询（ID 为客户端传入的原始字符串）
#[derive(Debug, Clone)]
pub struct GetMangaPage {
    pub page_id: String,
}

/// 列出漫画页查询
#[derive(Debug, Clone)]
pub struct ListMangaPages {
    pub limit: usize,
}

impl Default for ListMangaPages {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}
