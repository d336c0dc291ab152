//! Authorization error types.

use std::fmt;

/// Errors raised while authorizing a service call.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The actor lacks the privilege(s) required by the operation.
    ///
    /// Holds a single privilege for all-required operations (the first one
    /// missing) and the full declared list for any-of operations.
    #[error("Privileges required: {}", .privileges.join(","))]
    PrivilegesRequired {
        /// Privilege names reported to the caller.
        privileges: Vec<String>,
    },

    /// The operation requires an authenticated actor and there is none.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// No user account with this username exists.
    #[error("Unknown user: {username}")]
    UnknownUser {
        /// The username that was looked up.
        username: String,
    },

    /// A role referenced by a user or another role is not defined.
    #[error("Unknown role: {name}")]
    UnknownRole {
        /// The undefined role name.
        name: String,
    },

    /// The authorization setup is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a `PrivilegesRequired` error naming one privilege.
    #[must_use]
    pub fn privilege_required(privilege: impl Into<String>) -> Self {
        Self::PrivilegesRequired {
            privileges: vec![privilege.into()],
        }
    }

    /// Creates a `PrivilegesRequired` error naming several privileges.
    #[must_use]
    pub fn privileges_required<I, S>(privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::PrivilegesRequired {
            privileges: privileges.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a new `UnknownUser` error.
    #[must_use]
    pub fn unknown_user(username: impl Into<String>) -> Self {
        Self::UnknownUser {
            username: username.into(),
        }
    }

    /// Creates a new `UnknownRole` error.
    #[must_use]
    pub fn unknown_role(name: impl Into<String>) -> Self {
        Self::UnknownRole { name: name.into() }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the call was rejected for lack of privileges or
    /// authentication.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::PrivilegesRequired { .. } | Self::AuthenticationRequired
        )
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationRequired | Self::UnknownUser { .. } => {
                ErrorCategory::Authentication
            }
            Self::PrivilegesRequired { .. } => ErrorCategory::Authorization,
            Self::UnknownRole { .. } | Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

/// Broad classification of authorization errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No authenticated actor.
    Authentication,
    /// Authenticated (or anonymous) actor without the needed privileges.
    Authorization,
    /// Invalid role or operation setup.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::privilege_required("Add Encounters");
        assert_eq!(err.to_string(), "Privileges required: Add Encounters");

        let err = AuthError::privileges_required(["View Patients", "Edit Patients"]);
        assert_eq!(
            err.to_string(),
            "Privileges required: View Patients,Edit Patients"
        );

        assert_eq!(
            AuthError::AuthenticationRequired.to_string(),
            "Authentication required"
        );
        assert_eq!(
            AuthError::unknown_role("Ghost").to_string(),
            "Unknown role: Ghost"
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::AuthenticationRequired.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::privilege_required("x").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            AuthError::configuration("bad").category(),
            ErrorCategory::Configuration
        );
        assert!(AuthError::AuthenticationRequired.is_denial());
        assert!(!AuthError::unknown_role("x").is_denial());
        assert_eq!(
            AuthError::unknown_user("ghost").category(),
            ErrorCategory::Authentication
        );
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(ErrorCategory::Authorization.to_string(), "authorization");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }
}
