//! Storage key generation.
//!
//! Video keys are `{class}/{base64url(32 random bytes)}.mp4`. Uniqueness is probabilistic:
//! 256 bits of randomness make a collision negligible, so existing keys are never checked.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tubely_core::models::AspectRatio;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const VIDEO_KEY_RANDOM_BYTES: usize = 32;

/// Generate a fresh storage key for a video of the given aspect-ratio class.
///
/// Randomness comes straight from the operating system's generator.
pub fn video_key(aspect_ratio: AspectRatio) -> StorageResult<String> {
    let mut random = [0u8; VIDEO_KEY_RANDOM_BYTES];
    OsRng.try_fill_bytes(&mut random).map_err(|e| {
        StorageError::BackendError(format!("OS random number generator failed: {}", e))
    })?;
    Ok(format!(
        "{}/{}.mp4",
        aspect_ratio.key_prefix(),
        URL_SAFE_NO_PAD.encode(random)
    ))
}

/// Storage key for a video's thumbnail. Re-uploads overwrite the previous thumbnail.
pub fn thumbnail_key(video_id: Uuid, extension: &str) -> String {
    format!("thumbnails/{}.{}", video_id, extension)
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/') && !key.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_video_key_layout() {
        let key = video_key(AspectRatio::Landscape).unwrap();
        let name = key
            .strip_prefix("landscape/")
            .and_then(|rest| rest.strip_suffix(".mp4"))
            .expect("key should be landscape/<random>.mp4");

        // 32 bytes base64url without padding
        assert_eq!(name.len(), 43);
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_video_key_prefix_per_class() {
        assert!(video_key(AspectRatio::Portrait).unwrap().starts_with("portrait/"));
        assert!(video_key(AspectRatio::Other).unwrap().starts_with("other/"));
    }

    #[test]
    fn test_video_keys_do_not_repeat() {
        let keys: HashSet<String> = (0..256)
            .map(|_| video_key(AspectRatio::Other).unwrap())
            .collect();
        assert_eq!(keys.len(), 256);
    }

    #[test]
    fn test_thumbnail_key() {
        let id = Uuid::nil();
        assert_eq!(
            thumbnail_key(id, "png"),
            "thumbnails/00000000-0000-0000-0000-000000000000.png"
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("landscape/abc.mp4"));
        assert!(!validate_key("../etc/passwd"));
        assert!(!validate_key("/etc/passwd"));
        assert!(!validate_key(""));
    }
}
