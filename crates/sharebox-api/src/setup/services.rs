//! Service wiring.

use crate::state::AppState;
use anyhow::Result;
use sharebox_core::Config;
use sharebox_db::{FileStore, PgFileStore};
use sharebox_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Construct the application state from the database pool and storage backend.
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let store: Arc<dyn FileStore> = Arc::new(PgFileStore::new(pool));
    tracing::info!("File record store initialized (PostgreSQL)");

    Ok(Arc::new(AppState::new(store, storage, config.clone())))
}
