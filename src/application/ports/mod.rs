//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod repositories;
mod tts_engine;
mod vision_engine;

pub use repositories::{MangaPageRepositoryPort, RepositoryError, DEFAULT_LIST_LIMIT};
pub use tts_engine::{TtsEnginePort, TtsError};
pub use vision_engine::{VisionEnginePort, VisionError, VisionRequest};
