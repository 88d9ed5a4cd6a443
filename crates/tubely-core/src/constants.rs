//! Constants shared between the pipeline and the HTTP layer.

/// The only content type accepted for video uploads.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Multipart field carrying a video upload.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Multipart field carrying a thumbnail upload.
pub const THUMBNAIL_FORM_FIELD: &str = "thumbnail";

/// Bucket name reported by the local filesystem backend.
pub const LOCAL_BUCKET: &str = "local";

/// Issuer expected in access tokens.
pub const TOKEN_ISSUER: &str = "tubely-access";
