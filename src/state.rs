//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::convert::Converter;
use crate::store::ArtifactStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    converter: Converter,
}

impl AppState {
    pub fn new(config: Config, converter: Converter) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, converter }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the conversion service
    pub fn converter(&self) -> &Converter {
        &self.inner.converter
    }

    /// Get the artifact store
    pub fn store(&self) -> &ArtifactStore {
        self.inner.converter.store()
    }
}
