//! Application state for the schema gateway.

use std::sync::Arc;

use common::config::AppConfig;

use crate::repository::CatalogRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<dyn CatalogRepository>,
}

impl AppState {
    /// Creates a new application state around an already built repository.
    pub fn new(config: AppConfig, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { config, catalog }
    }
}
