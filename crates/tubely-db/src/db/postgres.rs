use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use tubely_core::models::{Video, VideoUrl};
use uuid::Uuid;

use crate::db::{StoreError, VideoRecordStore};

#[derive(Debug, FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    video_url: Option<String>,
    thumbnail_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VideoRow> for Video {
    type Error = StoreError;

    fn try_from(row: VideoRow) -> Result<Self, Self::Error> {
        let video_url = row
            .video_url
            .as_deref()
            .map(VideoUrl::decode)
            .transpose()
            .map_err(|e| StoreError::InvalidRecord {
                id: row.id,
                reason: e.to_string(),
            })?;

        Ok(Video {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            video_url,
            thumbnail_url: row.thumbnail_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for video rows in Postgres
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRecordStore for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Video, StoreError> {
        let row = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            SELECT id, user_id, title, description, video_url, thumbnail_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        row.try_into()
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2, description = $3, video_url = $4, thumbnail_url = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.video_url.as_ref().map(VideoUrl::encode))
        .bind(&video.thumbnail_url)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(video.id));
        }

        Ok(())
    }
}
