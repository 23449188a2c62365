//! services/client/src/session/state.rs
//!
//! The set of service adapters a session executes its effects against.

use crate::adapters::{HttpBackend, StaticCatalog};
use crate::config::{BackendMode, Config};
use crate::error::ClientError;
use coursehub_core::ports::{CourseCatalogService, QuestionAnsweringService};
use std::sync::Arc;
use tracing::info;

/// Shared adapters, created once at startup and cloned into every spawned request.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CourseCatalogService>,
    pub assistant: Arc<dyn QuestionAnsweringService>,
}

impl Services {
    /// Uses one adapter for both ports.
    pub fn shared<T>(backend: Arc<T>) -> Self
    where
        T: CourseCatalogService + QuestionAnsweringService + 'static,
    {
        Self {
            catalog: backend.clone(),
            assistant: backend,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        match config.backend {
            BackendMode::Http => {
                info!("Using the HTTP backend at {}", config.base_url);
                let backend = HttpBackend::new(config.base_url.clone())?;
                Ok(Self::shared(Arc::new(backend)))
            }
            BackendMode::Static => {
                info!("Using the built-in static catalog.");
                Ok(Self::shared(Arc::new(StaticCatalog::new())))
            }
        }
    }
}
