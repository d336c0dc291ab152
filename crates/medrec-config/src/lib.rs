//! Runtime configuration for medrec.
//!
//! Two layers live here:
//!
//! - [`settings`]: the static [`AppConfig`] read once at startup from a TOML
//!   file plus `MEDREC__*` environment overrides.
//! - [`properties`]: global properties, the administrator-editable key/value
//!   settings consulted during request handling. Every save or purge is
//!   announced to registered [`GlobalPropertyListener`]s and broadcast as a
//!   [`PropertyChangeEvent`].
//!
//! ```text
//!   save / purge
//!        │
//!  ┌─────▼──────────────┐      ┌──────────────────────┐
//!  │  GlobalProperties  │─────▶│ GlobalPropertyStore  │
//!  └─────┬────────┬─────┘      └──────────────────────┘
//!        │        │
//!        ▼        ▼
//!   listeners   broadcast
//!  (in-line)   (subscribers)
//! ```

pub mod events;
pub mod listener;
pub mod names;
pub mod properties;
pub mod settings;
pub mod store;

pub use events::{PropertyChangeEvent, PropertyOperation};
pub use listener::GlobalPropertyListener;
pub use properties::{GlobalProperties, GlobalProperty};
pub use settings::{AppConfig, LoggingConfig, RoleSettings, UserSettings, VisitSettings};
pub use store::{GlobalPropertyStore, InMemoryGlobalPropertyStore};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Core(#[from] medrec_core::CoreError),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
