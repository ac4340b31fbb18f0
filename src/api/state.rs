//! Application state for the payroll API.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the regulatory parameters loaded at startup. Parameters are
/// resolved per request from this read-only source.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given parameter loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the parameter loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }
}
