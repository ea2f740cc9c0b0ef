//! Application state.
//!
//! AppState aggregates the explicitly constructed services so handlers can
//! extract only what they need via Axum's `FromRef`. Services are built once
//! at startup and passed by reference; there are no lazily-initialized
//! globals.

use crate::services::files::FileLifecycleService;
use crate::services::share::ShareService;
use sharebox_core::Config;
use sharebox_db::FileStore;
use sharebox_storage::Storage;
use std::sync::Arc;

/// Main application state: aggregates services for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub files: FileLifecycleService,
    pub shares: ShareService,
    pub config: Config,
    pub is_production: bool,
}

impl AppState {
    /// Wire services from a record store, an object store, and configuration.
    pub fn new(store: Arc<dyn FileStore>, storage: Arc<dyn Storage>, config: Config) -> Self {
        let files =
            FileLifecycleService::new(store.clone(), storage, config.max_file_size_bytes());
        let shares = ShareService::new(store);
        let is_production = config.is_production();

        Self {
            files,
            shares,
            config,
            is_production,
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for FileLifecycleService {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.files.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for ShareService {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.shares.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
