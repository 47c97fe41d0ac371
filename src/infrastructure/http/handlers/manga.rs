//! Manga HTTP Handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;

use crate::application::{AnalyzeMangaPage, GetMangaPage, ListMangaPages};
use crate::domain::manga::MangaPage;
use crate::infrastructure::http::dto::{AnalyzeMangaRequest, AnalyzeMangaResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 分析成功的固定提示
pub const ANALYZE_SUCCESS_MESSAGE: &str = "Manga analyzed successfully";

/// POST /api/analyze-manga
///
/// 视觉服务不可用时仍返回 200，气泡为占位内容
pub async fn analyze_manga(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeMangaRequest>, JsonRejection>,
) -> Result<Json<AnalyzeMangaResponse>, ApiError> {
    let Json(req) = payload?;

    let command = AnalyzeMangaPage {
        title: req.title,
        image_data: req.image_data,
    };
    let result = state.analyze_page_handler.handle(command).await?;

    Ok(Json(AnalyzeMangaResponse {
        id: *result.page.id(),
        speech_bubbles: result.page.speech_bubbles().to_vec(),
        message: ANALYZE_SUCCESS_MESSAGE,
    }))
}

/// GET /api/manga-pages
pub async fn list_manga_pages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MangaPage>>, ApiError> {
    let pages = state
        .list_pages_handler
        .handle(ListMangaPages::default())
        .await?;
    Ok(Json(pages))
}

/// GET /api/manga-pages/:page_id
pub async fn get_manga_page(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<String>,
) -> Result<Json<MangaPage>, ApiError> {
    let page = state.get_page_handler.handle(GetMangaPage { page_id }).await?;
    Ok(Json(page))
}
