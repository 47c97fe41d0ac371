//! Manga Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{PageId, PageTitle, SpeechBubble};

/// MangaPage 聚合根
///
/// 不变量:
/// - 创建后不可修改（只暴露 getter）
/// - `speech_bubbles` 的顺序即朗读顺序
/// - `image_data` 按客户端提交原样保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaPage {
    id: PageId,
    title: PageTitle,
    image_data: String,
    speech_bubbles: Vec<SpeechBubble>,
    created_at: DateTime<Utc>,
}

impl MangaPage {
    /// 创建新漫画页
    pub fn new(title: PageTitle, image_data: String, speech_bubbles: Vec<SpeechBubble>) -> Self {
        Self {
            id: PageId::new(),
            title,
            image_data,
            speech_bubbles,
            created_at: Utc::now(),
        }
    }

    /// 从持久化数据重建
    pub fn restore(
        id: PageId,
        title: PageTitle,
        image_data: String,
        speech_bubbles: Vec<SpeechBubble>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            image_data,
            speech_bubbles,
            created_at,
        }
    }

    /// 朗读顺序是否无重复
    pub fn has_unique_reading_order(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.speech_bubbles.len());
        self.speech_bubbles
            .iter()
            .all(|bubble| seen.insert(bubble.reading_order()))
    }

    // Getters
    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn title(&self) -> &PageTitle {
        &self.title
    }

    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn speech_bubbles(&self) -> &[SpeechBubble] {
        &self.speech_bubbles
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
