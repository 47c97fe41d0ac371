//! Root Handler
//!
//! 健康检查

use axum::Json;

use crate::infrastructure::http::dto::MessageResponse;

/// 健康检查响应文本
pub const HEALTH_MESSAGE: &str = "Manga TTS App API";

/// GET /api/
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: HEALTH_MESSAGE,
    })
}
