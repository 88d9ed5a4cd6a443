//! Bearer-token authentication
//!
//! `middleware::auth_middleware` turns the `Authorization` header into an
//! [`models::AuthContext`] that protected handlers extract.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{AuthError, Authenticator, JwtAuthenticator};
pub use middleware::{auth_middleware, AuthState};
pub use models::AuthContext;
