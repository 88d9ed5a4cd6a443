pub mod assets;
pub mod health;
pub mod thumbnail_get;
pub mod thumbnail_upload;
pub mod video_get;
pub mod video_upload;

use crate::error::HttpAppError;
use tubely_core::AppError;
use uuid::Uuid;

/// Parse a `{videoID}` path segment.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, HttpAppError> {
    Uuid::parse_str(raw)
        .map_err(|_| HttpAppError::from(AppError::InvalidInput("Invalid ID".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);

        let HttpAppError(err) = parse_video_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(msg) if msg == "Invalid ID"));
    }
}
