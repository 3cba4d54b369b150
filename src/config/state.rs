// Application state module
// Bundles the startup configuration with the injected logger and artifact store

use crate::logger::SharedLogger;
use crate::store::ArtifactStore;

use super::types::Config;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub logger: SharedLogger,
    pub store: ArtifactStore,
}

impl AppState {
    pub fn new(config: Config, logger: SharedLogger) -> Self {
        let store = ArtifactStore::new(config.storage.base_dir.clone());
        Self {
            config,
            logger,
            store,
        }
    }
}
