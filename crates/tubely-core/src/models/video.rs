use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Where a video's playable file lives.
///
/// `ObjectRef` must be resolved to a presigned URL before it leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoUrl {
    Direct(String),
    ObjectRef { bucket: String, key: String },
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid stored video URL: {0:?}")]
pub struct InvalidVideoUrl(pub String);

impl VideoUrl {
    pub fn object_ref(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        VideoUrl::ObjectRef {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Column encoding: direct URLs verbatim, object references as `bucket,key`.
    pub fn encode(&self) -> String {
        match self {
            VideoUrl::Direct(url) => url.clone(),
            VideoUrl::ObjectRef { bucket, key } => format!("{},{}", bucket, key),
        }
    }

    /// Inverse of [`VideoUrl::encode`].
    ///
    /// Anything with an http(s) scheme is a direct URL; bucket names cannot contain
    /// `:` or `/`, so the two encodings never overlap.
    pub fn decode(raw: &str) -> Result<Self, InvalidVideoUrl> {
        if raw.starts_with("https://") || raw.starts_with("http://") {
            return Ok(VideoUrl::Direct(raw.to_string()));
        }

        match raw.split_once(',') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                Ok(VideoUrl::object_ref(bucket, key))
            }
            _ => Err(InvalidVideoUrl(raw.to_string())),
        }
    }
}

impl Display for VideoUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.encode())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<VideoUrl>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            video_url: None,
            thumbnail_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Client-facing video record. `video_url` is always directly usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Build a response from a record whose video URL has already been resolved.
    pub fn new(video: Video, resolved_video_url: Option<String>) -> Self {
        VideoResponse {
            id: video.id,
            user_id: video.user_id,
            title: video.title,
            description: video.description,
            video_url: resolved_video_url,
            thumbnail_url: video.thumbnail_url,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}
