//! Manga Context - Entities

use serde::{Deserialize, Serialize};

use super::{BubbleCoordinates, MangaError, ReadingOrder};

/// 对话气泡实体
///
/// `id` 只要求在所属漫画页内唯一；`text` 允许为空字符串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechBubble {
    id: String,
    text: String,
    coordinates: BubbleCoordinates,
    reading_order: ReadingOrder,
}

impl SpeechBubble {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        coordinates: BubbleCoordinates,
        reading_order: ReadingOrder,
    ) -> Result<Self, MangaError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(MangaError::InvalidBubbleId("bubble id cannot be empty"));
        }
        Ok(Self {
            id,
            text: text.into(),
            coordinates,
            reading_order,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn coordinates(&self) -> &BubbleCoordinates {
        &self.coordinates
    }

    pub fn reading_order(&self) -> ReadingOrder {
        self.reading_order
    }
}
