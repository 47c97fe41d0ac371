//! SQLite MangaPage Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{MangaPageRepositoryPort, RepositoryError};
use crate::domain::manga::{MangaPage, PageId, PageTitle, SpeechBubble};

/// SQLite MangaPage Repository
pub struct SqliteMangaPageRepository {
    pool: DbPool,
}

impl SqliteMangaPageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MangaPageRow {
    id: String,
    title: String,
    image_data: String,
    speech_bubbles: String,
    created_at: String,
}

impl TryFrom<MangaPageRow> for MangaPage {
    type Error = RepositoryError;

    fn try_from(row: MangaPageRow) -> Result<Self, Self::Error> {
        let id = PageId::parse(&row.id)
            .ok_or_else(|| RepositoryError::SerializationError(format!("invalid page id: {}", row.id)))?;
        let title = PageTitle::new(row.title)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let speech_bubbles: Vec<SpeechBubble> = serde_json::from_str(&row.speech_bubbles)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
            .with_timezone(&Utc);

        Ok(MangaPage::restore(id, title, row.image_data, speech_bubbles, created_at))
    }
}

#[async_trait]
impl MangaPageRepositoryPort for SqliteMangaPageRepository {
    async fn insert(&self, page: &MangaPage) -> Result<(), RepositoryError> {
        let bubbles = serde_json::to_string(page.speech_bubbles())
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO manga_pages (id, title, image_data, speech_bubbles, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(page.id().to_string())
        .bind(page.title().as_str())
        .bind(page.image_data())
        .bind(bubbles)
        .bind(page.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(format!("manga page {}", page.id()))
            }
            _ => RepositoryError::DatabaseError(e.to_string()),
        })?;

        Ok(())
    }

    async fn find_all(&self, limit: usize) -> Result<Vec<MangaPage>, RepositoryError> {
        let rows: Vec<MangaPageRow> = sqlx::query_as(
            "SELECT id, title, image_data, speech_bubbles, created_at FROM manga_pages ORDER BY rowid ASC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(MangaPage::try_from).collect()
    }

    async fn find_by_id(&self, id: &PageId) -> Result<Option<MangaPage>, RepositoryError> {
        let row: Option<MangaPageRow> = sqlx::query_as(
            "SELECT id, title, image_data, speech_bubbles, created_at FROM manga_pages WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(MangaPage::try_from).transpose()
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}
