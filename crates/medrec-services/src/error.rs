//! Service layer error types.

use medrec_auth::AuthError;
use medrec_config::ConfigError;
use medrec_core::CoreError;

/// Errors returned by medrec services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The system is set up in a way that cannot satisfy the request.
    #[error("{message}")]
    Configuration {
        /// Full description, shown to the caller as is.
        message: String,
    },

    /// No visit assignment handler is registered under this name.
    #[error("Unknown visit assignment handler: {name}")]
    UnknownHandler { name: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unknown_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler { name: name.into() }
    }

    /// Returns `true` for authorization denials.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Auth(err) if err.is_denial())
    }

    /// Returns `true` for setup defects that retrying will not fix.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::UnknownHandler { .. } | Self::Config(_)
        )
    }

    /// Returns `true` if the caller sent something invalid.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Auth(err) => err.is_denial(),
            Self::Core(err) => err.is_client_error(),
            _ => false,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
