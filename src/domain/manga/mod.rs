//! Manga Context - 漫画页限界上下文
//!
//! 职责:
//! - 漫画页聚合（标题、原始图片载荷、对话气泡）
//! - 对话气泡的几何与朗读顺序校验
//! - 图片载荷解析（data-URI 前缀剥离 + base64 解码）

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::MangaPage;
pub use entities::SpeechBubble;
pub use errors::MangaError;
pub use value_objects::{BubbleCoordinates, ImagePayload, PageId, PageTitle, ReadingOrder};
