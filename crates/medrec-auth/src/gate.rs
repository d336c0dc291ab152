//! Authorization gate.
//!
//! Every guarded service method calls [`AuthorizationGate::before`] with its
//! operation ID before doing any work. The gate looks the operation up in the
//! [`OperationRegistry`] and checks the actor's privileges against it:
//!
//! ```text
//! no descriptor / not authorized      -> allow
//! privileges, any-of                  -> first held privilege allows,
//!                                        none held denies with the full list
//! privileges, all-of                  -> first missing privilege denies
//! no privileges, authorized           -> deny if unauthenticated
//! empty privilege name in the list    -> allow
//! ```

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::audit::PrivilegeListener;
use crate::context::UserContext;
use crate::descriptor::OperationDescriptor;
use crate::error::AuthError;
use crate::registry::OperationRegistry;
use crate::AuthResult;

/// A service call about to be made.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Registered operation ID
    pub operation: &'a str,
    /// Service the operation belongs to, for diagnostics only
    pub target: &'a str,
}

impl<'a> Invocation<'a> {
    pub fn new(target: &'a str, operation: &'a str) -> Self {
        Self { operation, target }
    }
}

pub struct AuthorizationGate {
    registry: Arc<OperationRegistry>,
    listeners: RwLock<Vec<Arc<dyn PrivilegeListener>>>,
}

impl AuthorizationGate {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self {
            registry,
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn add_listener(&self, listener: Arc<dyn PrivilegeListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    /// Check `ctx` against the requirements registered for `invocation`.
    pub fn before(&self, ctx: &UserContext, invocation: &Invocation<'_>) -> AuthResult<()> {
        let Some(descriptor) = self.registry.get(invocation.operation) else {
            debug!(
                target_service = %invocation.target,
                operation = %invocation.operation,
                "No authorization requirement registered"
            );
            return Ok(());
        };

        let result = self.authorize(ctx, &descriptor);
        if let Err(err) = &result {
            warn!(
                target_service = %invocation.target,
                operation = %invocation.operation,
                user = ctx.authenticated_user().map_or("anonymous", |u| u.username.as_str()),
                error = %err,
                "Authorization denied"
            );
        }
        result
    }

    /// Check `ctx` against `descriptor`.
    pub fn authorize(&self, ctx: &UserContext, descriptor: &OperationDescriptor) -> AuthResult<()> {
        if !descriptor.privileges.is_empty() {
            for privilege in &descriptor.privileges {
                if privilege.is_empty() {
                    return Ok(());
                }
                let held = self.check_privilege(ctx, privilege);
                if descriptor.require_all {
                    if !held {
                        return Err(AuthError::privilege_required(privilege.clone()));
                    }
                } else if held {
                    return Ok(());
                }
            }

            if descriptor.require_all {
                return Ok(());
            }
            return Err(AuthError::privileges_required(
                descriptor.privileges.iter().cloned(),
            ));
        }

        if descriptor.authorized && !ctx.is_authenticated() {
            return Err(AuthError::AuthenticationRequired);
        }
        Ok(())
    }

    fn check_privilege(&self, ctx: &UserContext, privilege: &str) -> bool {
        let held = ctx.has_privilege(privilege);
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for listener in listeners.iter() {
            listener.privilege_checked(ctx.authenticated_user(), privilege, held);
        }
        held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privileges::{ANONYMOUS_ROLE, AUTHENTICATED_ROLE, SUPERUSER_ROLE};
    use crate::role::{Role, RoleDirectory, User};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingListener {
        checks: Mutex<Vec<(String, bool)>>,
    }

    impl PrivilegeListener for RecordingListener {
        fn privilege_checked(&self, _user: Option<&User>, privilege: &str, has_privilege: bool) {
            self.checks
                .lock()
                .unwrap()
                .push((privilege.to_string(), has_privilege));
        }
    }

    fn roles() -> Arc<RoleDirectory> {
        Arc::new(RoleDirectory::with_roles([
            Role::new(ANONYMOUS_ROLE),
            Role::new(AUTHENTICATED_ROLE),
            Role::new("Clerk").with_privilege("Edit Patients"),
            Role::new("Viewer").with_privileges(["View Patients", "View Encounters"]),
            Role::new(SUPERUSER_ROLE),
        ]))
    }

    fn anonymous() -> UserContext {
        UserContext::anonymous(roles())
    }

    fn user_with(role: &str) -> UserContext {
        UserContext::for_user(roles(), User::new(7, "tester").with_role(role))
    }

    fn gate() -> AuthorizationGate {
        let registry = OperationRegistry::new();
        registry.register(OperationDescriptor::any_of(
            "patient.view",
            ["View Patients", "Edit Patients"],
        ));
        registry.register(OperationDescriptor::all_of(
            "patient.merge",
            ["View Patients", "Edit Patients"],
        ));
        registry.register(OperationDescriptor::authenticated("session.info"));
        registry.register(OperationDescriptor {
            id: "plain".to_string(),
            ..Default::default()
        });
        AuthorizationGate::new(Arc::new(registry))
    }

    fn call(gate: &AuthorizationGate, ctx: &UserContext, operation: &str) -> AuthResult<()> {
        gate.before(ctx, &Invocation::new("PatientService", operation))
    }

    #[test]
    fn test_unregistered_operation_is_allowed() {
        assert!(call(&gate(), &anonymous(), "unknown.op").is_ok());
    }

    #[test]
    fn test_descriptor_without_requirements_is_allowed() {
        assert!(call(&gate(), &anonymous(), "plain").is_ok());
    }

    #[test]
    fn test_any_of_allows_on_second_privilege() {
        assert!(call(&gate(), &user_with("Clerk"), "patient.view").is_ok());
    }

    #[test]
    fn test_any_of_denies_with_full_list() {
        let err = call(&gate(), &anonymous(), "patient.view").unwrap_err();
        assert_eq!(err.to_string(), "Privileges required: View Patients,Edit Patients");
    }

    #[test]
    fn test_all_of_reports_first_missing_privilege() {
        let err = call(&gate(), &user_with("Clerk"), "patient.merge").unwrap_err();
        assert_eq!(err.to_string(), "Privileges required: View Patients");

        let err = call(&gate(), &user_with("Viewer"), "patient.merge").unwrap_err();
        assert_eq!(err.to_string(), "Privileges required: Edit Patients");
    }

    #[test]
    fn test_all_of_allows_when_everything_held() {
        assert!(call(&gate(), &user_with(SUPERUSER_ROLE), "patient.merge").is_ok());
    }

    #[test]
    fn test_authentication_only() {
        let gate = gate();
        let err = call(&gate, &anonymous(), "session.info").unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationRequired));
        assert_eq!(err.to_string(), "Authentication required");

        assert!(call(&gate, &user_with("Clerk"), "session.info").is_ok());
    }

    #[test]
    fn test_empty_privilege_short_circuits_to_allow() {
        let gate = gate();
        let descriptor = OperationDescriptor::all_of("odd", ["", "Never Granted"]);
        assert!(gate.authorize(&anonymous(), &descriptor).is_ok());

        let descriptor = OperationDescriptor::any_of("odd", ["Never Granted", ""]);
        assert!(gate.authorize(&anonymous(), &descriptor).is_ok());

        // A missing privilege before the placeholder still denies.
        let descriptor = OperationDescriptor::all_of("odd", ["Never Granted", ""]);
        assert!(gate.authorize(&anonymous(), &descriptor).is_err());
    }

    #[test]
    fn test_proxy_privilege_satisfies_gate() {
        let gate = gate();
        let mut ctx = anonymous();
        ctx.add_proxy_privilege("View Patients");
        assert!(call(&gate, &ctx, "patient.view").is_ok());
        ctx.remove_proxy_privilege("View Patients");
        assert!(call(&gate, &ctx, "patient.view").is_err());
    }

    #[test]
    fn test_listeners_see_checks_in_declared_order() {
        let gate = gate();
        let listener = Arc::new(RecordingListener::default());
        gate.add_listener(listener.clone());

        call(&gate, &user_with("Clerk"), "patient.view").unwrap();
        let _ = call(&gate, &user_with("Clerk"), "patient.merge");

        let checks = listener.checks.lock().unwrap();
        assert_eq!(
            *checks,
            vec![
                ("View Patients".to_string(), false),
                ("Edit Patients".to_string(), true),
                ("View Patients".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_any_of_stops_at_first_held() {
        let gate = gate();
        let listener = Arc::new(RecordingListener::default());
        gate.add_listener(listener.clone());

        call(&gate, &user_with("Viewer"), "patient.view").unwrap();
        assert_eq!(listener.checks.lock().unwrap().len(), 1);
    }
}
