use std::sync::Arc;

use tubely_core::Config;
use tubely_processing::IngestionPipeline;
use tubely_storage::{Storage, UrlSigner};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: IngestionPipeline,
    pub storage: Arc<dyn Storage>,
    /// Verifies `/assets` links minted by the local storage backend.
    pub url_signer: UrlSigner,
}
