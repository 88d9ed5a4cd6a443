//! Route prefixes

/// API path prefix
pub const API_PREFIX: &str = "/api";

/// Prefix for signed reads of locally stored objects
pub const ASSETS_PREFIX: &str = "/assets";

/// Slack on top of the largest upload for multipart framing and other form fields.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;
