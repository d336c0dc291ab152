//! Authorization requirements attached to service operations.

use serde::{Deserialize, Serialize};

/// Authorization requirement for one service operation.
///
/// An operation with no registered descriptor is unrestricted. A registered
/// descriptor with an empty privilege list still requires an authenticated
/// actor when `authorized` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Unique operation ID (e.g. "encounter.save")
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Module that provides this operation
    #[serde(default)]
    pub module: String,

    /// Privileges checked in declared order
    #[serde(default)]
    pub privileges: Vec<String>,

    /// `true`: every privilege is needed. `false`: any one suffices.
    #[serde(default)]
    pub require_all: bool,

    /// Whether the operation carries an authorization requirement at all
    #[serde(default)]
    pub authorized: bool,
}

impl OperationDescriptor {
    /// Operation that only needs an authenticated actor.
    pub fn authenticated(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            authorized: true,
            ..Default::default()
        }
    }

    /// Operation allowed if the actor holds any of `privileges`.
    pub fn any_of<I, S>(id: impl Into<String>, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            privileges: privileges.into_iter().map(Into::into).collect(),
            require_all: false,
            authorized: true,
            ..Default::default()
        }
    }

    /// Operation allowed only if the actor holds every one of `privileges`.
    pub fn all_of<I, S>(id: impl Into<String>, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            require_all: true,
            ..Self::any_of(id, privileges)
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }
}

/// Implemented by each service to expose the operations it guards.
pub trait OperationProvider: Send + Sync {
    fn operations(&self) -> Vec<OperationDescriptor>;

    fn module_id(&self) -> &str;
}
