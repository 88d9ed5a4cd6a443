//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState, JwtAuthenticator};
use crate::constants::{API_PREFIX, ASSETS_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        authenticator: Arc::new(JwtAuthenticator::new(config.jwt_secret())),
    };

    let protected_routes = protected_routes().layer(axum::middleware::from_fn_with_state(
        Arc::new(auth_state),
        auth_middleware,
    ));

    let mut app = public_routes().merge(protected_routes);

    if config.storage_backend == StorageBackend::Local {
        app = app.route(
            &format!("{}/{{*key}}", ASSETS_PREFIX),
            get(handlers::assets::get_asset),
        );
    }

    // Upload size caps are enforced by the pipeline; this only bounds the whole request.
    let body_limit = config
        .max_video_size_bytes
        .max(config.max_thumbnail_size_bytes)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = app
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            &format!("{}/thumbnails/{{video_id}}", API_PREFIX),
            get(handlers::thumbnail_get::get_thumbnail),
        )
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(handlers::video_get::get_video),
        )
        .route(
            &format!("{}/videos/{{video_id}}/upload", API_PREFIX),
            post(handlers::video_upload::upload_video),
        )
        .route(
            &format!("{}/thumbnail_upload/{{video_id}}", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.base.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .base
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
