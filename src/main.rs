//! Manga Narrator - 漫画对白识别与朗读服务
//!
//! 启动流程: 配置 → 日志 → 页面存储 → 视觉/TTS 客户端 → HTTP 服务器

use std::sync::Arc;
use std::time::Duration;

use manga_narrator::application::{MangaPageRepositoryPort, TtsEnginePort, VisionEnginePort};
use manga_narrator::config::{load_config, print_config, AppConfig, StorageBackend};
use manga_narrator::infrastructure::adapters::{
    FakeTtsClient, FakeVisionClient, OpenAiTtsClient, OpenAiTtsClientConfig, OpenAiVisionClient,
    OpenAiVisionClientConfig,
};
use manga_narrator::infrastructure::http::state::EngineTimeouts;
use manga_narrator::infrastructure::http::{AppState, HttpServer, ServerConfig};
use manga_narrator::infrastructure::memory::InMemoryMangaPageRepository;
use manga_narrator::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteMangaPageRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Manga Narrator - manga speech bubble reader");
    print_config(&config);

    let page_repo = build_page_repository(&config).await?;
    let (vision_engine, tts_engine) = build_engines(&config)?;

    let timeouts = EngineTimeouts {
        vision: Duration::from_secs(config.vision.timeout_secs),
        tts: Duration::from_secs(config.tts.timeout_secs),
    };
    let state = AppState::new(page_repo.clone(), vision_engine, tts_engine, timeouts);

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_max_body_bytes(config.server.max_body_bytes);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    page_repo.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},manga_narrator={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_page_repository(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn MangaPageRepositoryPort>> {
    match config.database.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory page storage, pages are lost on restart");
            Ok(Arc::new(InMemoryMangaPageRepository::new()))
        }
        StorageBackend::Sqlite => {
            // 确保数据目录存在
            if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }

            let db_config = DatabaseConfig {
                database_url: config.database.database_url(),
                max_connections: config.database.max_connections,
            };
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;

            Ok(Arc::new(SqliteMangaPageRepository::new(pool)))
        }
    }
}

/// 未配置 API Key 时使用始终不可用的客户端，请求走降级路径
fn build_engines(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn VisionEnginePort>, Arc<dyn TtsEnginePort>)> {
    if !config.openai.is_configured() {
        tracing::warn!("OpenAI API key not set, vision and TTS will return placeholder results");
        let vision: Arc<dyn VisionEnginePort> = Arc::new(FakeVisionClient::unavailable());
        let tts: Arc<dyn TtsEnginePort> = Arc::new(FakeTtsClient::unavailable());
        return Ok((vision, tts));
    }

    let vision_config =
        OpenAiVisionClientConfig::new(&config.openai.base_url, &config.openai.api_key)
            .with_model(&config.vision.model)
            .with_max_tokens(config.vision.max_tokens)
            .with_timeout(config.vision.timeout_secs);
    let tts_config = OpenAiTtsClientConfig::new(&config.openai.base_url, &config.openai.api_key)
        .with_model(&config.tts.model)
        .with_timeout(config.tts.timeout_secs);

    let vision: Arc<dyn VisionEnginePort> = Arc::new(OpenAiVisionClient::new(vision_config)?);
    let tts: Arc<dyn TtsEnginePort> = Arc::new(OpenAiTtsClient::new(tts_config)?);
    Ok((vision, tts))
}
