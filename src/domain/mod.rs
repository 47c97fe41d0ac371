//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Manga Context: 漫画页与对话气泡
//! - Speech Context: 语音合成参数

pub mod manga;
pub mod speech;

// 视觉模型输出归一化
mod bubble_normalizer;

pub use bubble_normalizer::{
    fallback_bubbles, normalize_bubbles, BubbleSource, FallbackReason, NormalizedBubbles,
    BUBBLES_KEY,
};
