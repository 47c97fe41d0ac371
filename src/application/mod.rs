//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（VisionEngine、TtsEngine、MangaPageRepository）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    AnalyzeMangaPage,
    GenerateSpeech,
    // Handlers
    handlers::{
        AnalyzeMangaPageHandler, AnalyzeMangaPageResponse, GenerateSpeechHandler,
        GenerateSpeechResponse, SpeechOutcome, BUBBLE_EXTRACTION_PROMPT, SPEECH_UNAVAILABLE_MESSAGE,
    },
};

pub use error::ApplicationError;

pub use ports::{
    MangaPageRepositoryPort, RepositoryError, TtsEnginePort, TtsError, VisionEnginePort,
    VisionError, VisionRequest, DEFAULT_LIST_LIMIT,
};

pub use queries::{
    GetMangaPage,
    ListMangaPages,
    // Handlers
    handlers::{GetMangaPageHandler, ListMangaPagesHandler},
};
