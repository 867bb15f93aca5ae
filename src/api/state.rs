//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::{MemoryRepository, Repository};

/// Shared application state.
///
/// Holds the read-only configuration and the repository every handler
/// writes through.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    repository: Arc<dyn Repository>,
}

impl AppState {
    /// Creates application state backed by the given repository.
    pub fn new(config: ConfigLoader, repository: Arc<dyn Repository>) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }

    /// Creates application state backed by a fresh in-memory repository.
    pub fn in_memory(config: ConfigLoader) -> Self {
        Self::new(config, Arc::new(MemoryRepository::new()))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the repository.
    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }
}
