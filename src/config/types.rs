//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAI 接入配置（视觉与 TTS 共用）
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// 视觉模型配置
    #[serde(default)]
    pub vision: VisionConfig,

    /// TTS 配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节），图片以 base64 内嵌在 JSON 中
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// OpenAI 接入配置
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API 基础 URL
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// API Key，为空时视觉和 TTS 都走降级路径
    #[serde(default)]
    pub api_key: String,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: String::new(),
        }
    }
}

impl OpenAiConfig {
    /// 是否配置了 API Key
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 日志中展示的 Key，仅保留末 4 位
    pub fn masked_api_key(&self) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return "<not set>".to_string();
        }
        let tail: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", tail)
    }
}

/// 视觉模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_vision_model")]
    pub model: String,

    #[serde(default = "default_vision_max_tokens")]
    pub max_tokens: u32,

    /// 请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_vision_model() -> String {
    "gpt-4o".to_string()
}

fn default_vision_max_tokens() -> u32 {
    1000
}

fn default_engine_timeout() -> u64 {
    60
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: default_vision_model(),
            max_tokens: default_vision_max_tokens(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

/// TTS 配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_tts_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            model: default_tts_model(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

/// 页面存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    /// 进程内存储，重启后丢失
    Memory,
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/manga.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取 SQLite 连接 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否输出 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
