//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use coursehub_core::ContextShape;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which implementation serves courses, files and answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMode {
    /// The remote HTTP/JSON backend at `base_url`.
    Http,
    /// Built-in sample data; no network access.
    Static,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: reqwest::Url,
    pub backend: BackendMode,
    pub context_shape: ContextShape,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url_str =
            lookup("COURSEHUB_BASE_URL").unwrap_or_else(|| "http://localhost:8080".to_string());
        let base_url = reqwest::Url::parse(&base_url_str).map_err(|e| {
            ConfigError::InvalidValue("COURSEHUB_BASE_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue(
                "COURSEHUB_BASE_URL".to_string(),
                format!("'{}' cannot be used as a base URL", base_url_str),
            ));
        }

        let backend_str = lookup("COURSEHUB_BACKEND").unwrap_or_else(|| "http".to_string());
        let backend = match backend_str.trim().to_lowercase().as_str() {
            "http" => BackendMode::Http,
            "static" => BackendMode::Static,
            _ => {
                return Err(ConfigError::InvalidValue(
                    "COURSEHUB_BACKEND".to_string(),
                    format!("'{}' is not one of: http, static", backend_str),
                ))
            }
        };

        let context_shape = match lookup("COURSEHUB_CONTEXT_SHAPE") {
            Some(value) => value.parse::<ContextShape>().map_err(|e| {
                ConfigError::InvalidValue("COURSEHUB_CONTEXT_SHAPE".to_string(), e.to_string())
            })?,
            None => ContextShape::default(),
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            base_url,
            backend,
            context_shape,
            log_level,
        })
    }
}
