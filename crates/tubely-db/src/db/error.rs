use tubely_core::AppError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Video {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: Uuid, reason: String },

    #[error("Store error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("Couldn't find video {}", id)),
            other => AppError::Database(other.to_string()),
        }
    }
}
