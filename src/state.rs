//! Shared application state for all routes.

use crate::config::Config;
use crate::crud::CrudProvider;
use crate::error::AppError;
use crate::registry::Registry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(registry: Registry, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    /// Resolve a provider by model name; unknown names are not-found.
    pub fn provider(&self, model: &str) -> Result<Arc<dyn CrudProvider>, AppError> {
        self.registry
            .get(model)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("model '{}'", model)))
    }
}
