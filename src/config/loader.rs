//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "MANGA";

/// 未通过 `MANGA_OPENAI__API_KEY` 配置时读取的通用变量
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `MANGA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `MANGA_SERVER__PORT=8080`
/// - `MANGA_OPENAI__API_KEY=sk-...`（或 `OPENAI_API_KEY=sk-...`）
/// - `MANGA_VISION__MODEL=gpt-4o-mini`
/// - `MANGA_DATABASE__BACKEND=memory`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8001)?
        .set_default("server.max_body_bytes", 20 * 1024 * 1024)?
        .set_default("openai.base_url", "https://api.openai.com/v1")?
        .set_default("openai.api_key", "")?
        .set_default("vision.model", "gpt-4o")?
        .set_default("vision.max_tokens", 1000)?
        .set_default("vision.timeout_secs", 60)?
        .set_default("tts.model", "tts-1")?
        .set_default("tts.timeout_secs", 60)?
        .set_default("database.backend", "sqlite")?
        .set_default("database.path", "data/manga.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: MANGA_VISION__TIMEOUT_SECS=30
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_api_key_fallback(&mut app_config, std::env::var(OPENAI_API_KEY_ENV).ok());

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 未配置 Key 时使用 `OPENAI_API_KEY`
fn apply_api_key_fallback(config: &mut AppConfig, fallback: Option<String>) {
    if config.openai.is_configured() {
        return;
    }
    if let Some(key) = fallback.filter(|k| !k.trim().is_empty()) {
        config.openai.api_key = key;
    }
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Server max_body_bytes cannot be 0".to_string(),
        ));
    }

    if config.openai.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "OpenAI base URL cannot be empty".to_string(),
        ));
    }

    if config.vision.timeout_secs == 0 || config.tts.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Engine timeouts must be greater than 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "Database max_connections cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Max Body Size: {} bytes", config.server.max_body_bytes);
    tracing::info!("OpenAI Base URL: {}", config.openai.base_url);
    tracing::info!("OpenAI API Key: {}", config.openai.masked_api_key());
    tracing::info!(
        "Vision: model={}, timeout={}s",
        config.vision.model,
        config.vision.timeout_secs
    );
    tracing::info!(
        "TTS: model={}, timeout={}s",
        config.tts.model,
        config.tts.timeout_secs
    );
    tracing::info!("Storage Backend: {:?}", config.database.backend);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
