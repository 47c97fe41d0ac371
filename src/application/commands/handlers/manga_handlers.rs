//! Manga Command Handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::AnalyzeMangaPage;
use crate::application::error::ApplicationError;
use crate::application::ports::{MangaPageRepositoryPort, VisionEnginePort, VisionRequest};
use crate::domain::manga::{ImagePayload, MangaPage, PageTitle};
use crate::domain::{normalize_bubbles, BubbleSource};

/// 视觉模型指令
///
/// 键名 `speech_bubbles` 与对外 JSON 格式一致，修改时需同步 `BUBBLES_KEY`
pub const BUBBLE_EXTRACTION_PROMPT: &str = r#"Analyze this manga image and extract all speech bubbles with their text and approximate coordinates.
Return a JSON response with the following structure:
{
  "speech_bubbles": [
    {
      "id": "unique_id",
      "text": "extracted text",
      "coordinates": {"x": 0.1, "y": 0.2, "width": 0.3, "height": 0.1},
      "reading_order": 1
    }
  ]
}

Coordinates should be relative (0-1) where 0,0 is top-left and 1,1 is bottom-right.
Reading order should follow manga convention (right-to-left, top-to-bottom).
Only include actual speech bubbles with readable text."#;

/// 视觉服务调用的默认超时
pub const DEFAULT_VISION_TIMEOUT: Duration = Duration::from_secs(60);

/// 分析结果
#[derive(Debug, Clone)]
pub struct AnalyzeMangaPageResponse {
    pub page: MangaPage,
    pub source: BubbleSource,
}

/// AnalyzeMangaPage Handler
///
/// 流程: 解码图片 → 视觉模型 → 归一化 → 持久化。
/// 视觉服务失败或超时不会返回错误，而是交给归一化器生成占位气泡；
/// 只有参数错误和存储错误会传播给调用方。
pub struct AnalyzeMangaPageHandler {
    vision_engine: Arc<dyn VisionEnginePort>,
    page_repo: Arc<dyn MangaPageRepositoryPort>,
    timeout: Duration,
}

impl AnalyzeMangaPageHandler {
    pub fn new(
        vision_engine: Arc<dyn VisionEnginePort>,
        page_repo: Arc<dyn MangaPageRepositoryPort>,
    ) -> Self {
        Self {
            vision_engine,
            page_repo,
            timeout: DEFAULT_VISION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        command: AnalyzeMangaPage,
    ) -> Result<AnalyzeMangaPageResponse, ApplicationError> {
        let title = PageTitle::new(command.title)?;
        let image = ImagePayload::parse(command.image_data)?;

        tracing::info!(
            title = %title,
            image_bytes = image.bytes().len(),
            mime_type = %image.mime_type(),
            "Analyzing manga page"
        );

        let raw = self.request_bubbles(&image).await;
        let normalized = normalize_bubbles(raw.as_deref());

        let page = MangaPage::new(title, image.into_raw(), normalized.bubbles);
        if !page.has_unique_reading_order() {
            tracing::warn!(page_id = %page.id(), "Page has duplicate reading order values");
        }

        self.page_repo.insert(&page).await?;

        match normalized.source {
            BubbleSource::Model => tracing::info!(
                page_id = %page.id(),
                bubbles = page.speech_bubbles().len(),
                "Manga page analyzed"
            ),
            BubbleSource::Fallback(reason) => tracing::warn!(
                page_id = %page.id(),
                bubbles = page.speech_bubbles().len(),
                fallback = reason.as_str(),
                "Manga page analyzed with placeholder bubbles"
            ),
        }

        Ok(AnalyzeMangaPageResponse {
            page,
            source: normalized.source,
        })
    }

    /// 调用视觉服务，失败或超时返回 None
    async fn request_bubbles(&self, image: &ImagePayload) -> Option<String> {
        let request = VisionRequest {
            prompt: BUBBLE_EXTRACTION_PROMPT.to_string(),
            image_url: image.to_data_uri(),
        };

        match tokio::time::timeout(self.timeout, self.vision_engine.analyze(request)).await {
            Ok(Ok(text)) => Some(text),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Vision service failed, falling back");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Vision service timed out, falling back"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::application::ports::{RepositoryError, VisionError};
    use crate::domain::manga::PageId;
    use crate::domain::FallbackReason;
    use crate::infrastructure::adapters::FakeVisionClient;
    use crate::infrastructure::memory::InMemoryMangaPageRepository;

    const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    const MODEL_RESPONSE: &str = r#"```json
{"speech_bubbles": [
  {"id": "b2", "text": "Run!", "coordinates": {"x": 0.1, "y": 0.5, "width": 0.2, "height": 0.1}, "reading_order": 2},
  {"id": "b1", "text": "What was that?", "coordinates": {"x": 0.7, "y": 0.1, "width": 0.2, "height": 0.1}, "reading_order": 1}
]}
```"#;

    struct BrokenRepository;

    #[async_trait]
    impl MangaPageRepositoryPort for BrokenRepository {
        async fn insert(&self, _page: &MangaPage) -> Result<(), RepositoryError> {
            Err(RepositoryError::DatabaseError("disk full".to_string()))
        }

        async fn find_all(&self, _limit: usize) -> Result<Vec<MangaPage>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: &PageId) -> Result<Option<MangaPage>, RepositoryError> {
            Ok(None)
        }
    }

    fn command(title: &str, image_data: &str) -> AnalyzeMangaPage {
        AnalyzeMangaPage {
            title: title.to_string(),
            image_data: image_data.to_string(),
        }
    }

    #[tokio::test]
    async fn test_model_bubbles_are_sorted_and_persisted() {
        let vision = Arc::new(FakeVisionClient::responding(MODEL_RESPONSE));
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision.clone(), repo.clone());

        let result = handler.handle(command("Test Page", PNG_BASE64)).await.unwrap();

        assert_eq!(result.source, BubbleSource::Model);
        let ids: Vec<&str> = result.page.speech_bubbles().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);

        let stored = repo.find_by_id(result.page.id()).await.unwrap().unwrap();
        assert_eq!(stored, result.page);

        // 视觉请求携带指令与 data-URI
        let request = vision.last_request().unwrap();
        assert!(request.prompt.contains("speech_bubbles"));
        assert!(request.image_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_vision_failure_falls_back() {
        let vision = Arc::new(FakeVisionClient::failing(VisionError::NetworkError(
            "connection refused".to_string(),
        )));
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision, repo.clone());

        let result = handler.handle(command("Test Page", PNG_BASE64)).await.unwrap();

        assert_eq!(result.source, BubbleSource::Fallback(FallbackReason::NoResponse));
        assert_eq!(result.page.speech_bubbles().len(), 2);
        assert!(repo.find_by_id(result.page.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_vision_timeout_falls_back() {
        let vision = Arc::new(
            FakeVisionClient::responding(MODEL_RESPONSE).with_delay(Duration::from_secs(5)),
        );
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision, repo)
            .with_timeout(Duration::from_millis(20));

        let result = handler.handle(command("Slow", PNG_BASE64)).await.unwrap();
        assert_eq!(result.source, BubbleSource::Fallback(FallbackReason::NoResponse));
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let vision = Arc::new(FakeVisionClient::responding("Sorry, I can't help with that."));
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision, repo);

        let result = handler.handle(command("Page", PNG_BASE64)).await.unwrap();
        assert_eq!(result.source, BubbleSource::Fallback(FallbackReason::Unparseable));
        assert_eq!(result.page.speech_bubbles().len(), 1);
    }

    #[tokio::test]
    async fn test_image_data_stored_verbatim() {
        let vision = Arc::new(FakeVisionClient::failing(VisionError::NotConfigured));
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision, repo);

        let image_data = format!("data:image/png;base64,{}", PNG_BASE64);
        let result = handler.handle(command("Page", &image_data)).await.unwrap();
        assert_eq!(result.page.image_data(), image_data);
    }

    #[tokio::test]
    async fn test_same_input_twice_creates_two_pages() {
        let vision = Arc::new(FakeVisionClient::failing(VisionError::Timeout));
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision, repo.clone());

        let first = handler.handle(command("Same", PNG_BASE64)).await.unwrap();
        let second = handler.handle(command("Same", PNG_BASE64)).await.unwrap();

        assert_ne!(first.page.id(), second.page.id());
        assert!(repo.find_by_id(first.page.id()).await.unwrap().is_some());
        assert!(repo.find_by_id(second.page.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_vision_call() {
        let vision = Arc::new(FakeVisionClient::responding(MODEL_RESPONSE));
        let repo = Arc::new(InMemoryMangaPageRepository::new());
        let handler = AnalyzeMangaPageHandler::new(vision.clone(), repo);

        let empty_title = handler.handle(command("", PNG_BASE64)).await;
        assert!(matches!(empty_title, Err(ApplicationError::InvalidInput(_))));

        let missing_image = handler.handle(command("Invalid Request", "")).await;
        assert!(matches!(missing_image, Err(ApplicationError::InvalidInput(_))));

        let bad_image = handler.handle(command("Bad", "data:image/png;base64,%%%")).await;
        assert!(matches!(bad_image, Err(ApplicationError::InvalidInput(_))));

        assert!(vision.last_request().is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_is_surfaced() {
        let vision = Arc::new(FakeVisionClient::responding(MODEL_RESPONSE));
        let handler = AnalyzeMangaPageHandler::new(vision, Arc::new(BrokenRepository));

        let result = handler.handle(command("Page", PNG_BASE64)).await;
        assert!(matches!(result, Err(ApplicationError::StorageError(_))));
    }
}
