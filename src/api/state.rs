//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{CacheBackend, Database};
use crate::services::{ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    /// Every use case, behind traits
    pub services: Arc<dyn ServiceContainer>,
    /// Sessions, profile cache and rate limits
    pub cache: Arc<dyn CacheBackend>,
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the production services over the database connection.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<dyn CacheBackend>,
        config: Config,
    ) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config.clone(),
        ));

        Self::new(services, cache, database, config)
    }

    /// Assemble state from already-built services (tests and embedding).
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        cache: Arc<dyn CacheBackend>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            services,
            cache,
            database,
            config: Arc::new(config),
        }
    }
}
