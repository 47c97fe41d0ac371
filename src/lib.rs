//! Manga Narrator - 漫画对白识别与朗读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Manga Context: 漫画页面与对白气泡
//! - Speech Context: 朗读请求（音色、语速）
//! - 气泡归一化: 视觉模型输出 → 合法气泡列表
//!
//! 应用层 (application/):
//! - Ports: 端口定义（VisionEngine, TtsEngine, MangaPageRepository）
//! - Commands: 分析页面、生成语音
//! - Queries: 页面查询
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: OpenAI 视觉与 TTS 客户端
//! - Persistence: SQLite 存储
//! - Memory: 内存存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
