//! Tubely API Library
//!
//! HTTP handlers, authentication and application setup for the upload service.

pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
