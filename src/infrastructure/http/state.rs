//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Command handlers
    AnalyzeMangaPageHandler, GenerateSpeechHandler,
    // Query handlers
    GetMangaPageHandler, ListMangaPagesHandler,
    // Ports
    MangaPageRepositoryPort, TtsEnginePort, VisionEnginePort,
};

/// 外部服务调用超时
#[derive(Debug, Clone, Copy)]
pub struct EngineTimeouts {
    pub vision: Duration,
    pub tts: Duration,
}

impl Default for EngineTimeouts {
    fn default() -> Self {
        Self {
            vision: Duration::from_secs(60),
            tts: Duration::from_secs(60),
        }
    }
}

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub analyze_page_handler: AnalyzeMangaPageHandler,
    pub generate_speech_handler: GenerateSpeechHandler,

    // ========== Query Handlers ==========
    pub get_page_handler: GetMangaPageHandler,
    pub list_pages_handler: ListMangaPagesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        page_repo: Arc<dyn MangaPageRepositoryPort>,
        vision_engine: Arc<dyn VisionEnginePort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        timeouts: EngineTimeouts,
    ) -> Self {
        Self {
            // Command handlers
            analyze_page_handler: AnalyzeMangaPageHandler::new(vision_engine, page_repo.clone())
                .with_timeout(timeouts.vision),
            generate_speech_handler: GenerateSpeechHandler::new(tts_engine)
                .with_timeout(timeouts.tts),

            // Query handlers
            get_page_handler: GetMangaPageHandler::new(page_repo.clone()),
            list_pages_handler: ListMangaPagesHandler::new(page_repo),
        }
    }
}
