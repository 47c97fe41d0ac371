//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：分析漫画页、生成语音

mod manga_commands;
mod speech_commands;

pub mod handlers;

pub use manga_commands::*;
pub use speech_commands::*;
