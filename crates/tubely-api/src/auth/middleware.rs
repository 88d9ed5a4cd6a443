use crate::auth::jwt::{AuthError, Authenticator};
use crate::auth::models::AuthContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
}

/// Bearer token from the `Authorization` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match get_bearer_token(request.headers())
        .and_then(|token| auth_state.authenticator.validate(token))
    {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(
                error = %e,
                path = %request.uri().path(),
                "Authentication failed"
            );
            return HttpAppError::from(e).into_response();
        }
    };

    request.extensions_mut().insert(AuthContext { user_id });
    next.run(request).await
}
