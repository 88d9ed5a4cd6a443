//! Helpers for streaming a single file part out of a multipart body

use axum::extract::multipart::Field;
use futures::TryStreamExt;
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use tubely_core::AppError;

use crate::error::HttpAppError;

/// Declared content type of a part, empty when absent.
pub fn field_content_type(field: &Field<'_>) -> String {
    field.content_type().unwrap_or_default().to_string()
}

/// Expose a part's body as a byte reader without buffering it.
pub fn field_reader<'a>(field: Field<'a>) -> impl AsyncRead + Unpin + Send + 'a {
    StreamReader::new(Box::pin(field.map_err(io::Error::other)))
}

/// Error for a form that ended before the expected file part.
pub fn missing_field(name: &str) -> HttpAppError {
    AppError::InvalidInput(format!("Unable to get file from form field {:?}", name)).into()
}
