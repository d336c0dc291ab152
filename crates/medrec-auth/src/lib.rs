//! Privilege-based authorization for medrec services.
//!
//! Services register an [`OperationDescriptor`] for each guarded method and
//! call [`AuthorizationGate::before`] with the caller's [`UserContext`]
//! before running the method body.

pub mod audit;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod gate;
pub mod privileges;
pub mod registry;
pub mod role;

pub use audit::{PrivilegeListener, TracingPrivilegeListener};
pub use context::UserContext;
pub use descriptor::{OperationDescriptor, OperationProvider};
pub use error::{AuthError, ErrorCategory};
pub use gate::{AuthorizationGate, Invocation};
pub use registry::OperationRegistry;
pub use role::{Role, RoleDirectory, User};

pub type AuthResult<T> = std::result::Result<T, AuthError>;
