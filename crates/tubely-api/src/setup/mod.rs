//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use tubely_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.base.log_json)?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend,
        "Configuration loaded and validated successfully"
    );

    let pool = match &config.database_url {
        Some(url) => Some(database::setup_database(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, video records are kept in memory");
            None
        }
    };

    let state = services::initialize_services(&config, pool).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
