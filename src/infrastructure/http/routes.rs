//! HTTP Routes
//!
//! API Endpoints:
//! - /api/                       GET   健康检查
//! - /api/analyze-manga          POST  分析漫画页面并保存
//! - /api/generate-speech        POST  文本转语音
//! - /api/manga-pages            GET   列出已保存页面
//! - /api/manga-pages/:page_id   GET   获取单个页面

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    api_routes()
}

/// API 路由，`/api` 与 `/api/` 都指向健康检查
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api", get(handlers::root))
        .route("/api/", get(handlers::root))
        .route("/api/analyze-manga", post(handlers::analyze_manga))
        .route("/api/generate-speech", post(handlers::generate_speech))
        .route("/api/manga-pages", get(handlers::list_manga_pages))
        .route("/api/manga-pages/:page_id", get(handlers::get_manga_page))
}
