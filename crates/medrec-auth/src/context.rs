//! Per-session actor context.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::privileges::{ANONYMOUS_ROLE, AUTHENTICATED_ROLE};
use crate::role::{RoleDirectory, User};

/// The actor on whose behalf service calls are made.
///
/// Privileges come from three places: the authenticated user's roles
/// (including inherited ones and the `Authenticated` role), temporary proxy
/// grants, and the `Anonymous` role which applies to everyone.
#[derive(Debug, Clone)]
pub struct UserContext {
    roles: Arc<RoleDirectory>,
    user: Option<User>,
    // Reference counted so nested grants of the same privilege unwind correctly.
    proxy_privileges: HashMap<String, usize>,
}

impl UserContext {
    /// An unauthenticated context.
    pub fn anonymous(roles: Arc<RoleDirectory>) -> Self {
        Self {
            roles,
            user: None,
            proxy_privileges: HashMap::new(),
        }
    }

    /// A context already authenticated as `user`.
    pub fn for_user(roles: Arc<RoleDirectory>, user: User) -> Self {
        let mut context = Self::anonymous(roles);
        context.authenticate(user);
        context
    }

    pub fn authenticate(&mut self, user: User) {
        tracing::debug!(username = %user.username, "User authenticated");
        self.user = Some(user);
    }

    /// Drop the authenticated user. Proxy grants are left in place.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::debug!(username = %user.username, "User logged out");
        }
    }

    pub fn authenticated_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the authenticated user holds the superuser role.
    pub fn is_superuser(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| self.roles.includes_superuser(&user.roles))
    }

    /// Role names that currently apply to this actor, including inherited
    /// and implicit ones.
    pub fn effective_roles(&self) -> Vec<String> {
        self.roles.expand(&self.role_names())
    }

    pub fn has_privilege(&self, privilege: &str) -> bool {
        if privilege.is_empty() {
            return true;
        }
        if self.proxy_privileges.contains_key(privilege) {
            return true;
        }
        self.roles.grants(&self.role_names(), privilege)
    }

    /// Every named privilege this actor holds, without expanding the
    /// superuser wildcard.
    pub fn privileges(&self) -> HashSet<String> {
        let mut privileges = self.roles.privileges_of(&self.role_names());
        privileges.extend(self.proxy_privileges.keys().cloned());
        privileges
    }

    /// Temporarily grant `privilege` until a matching
    /// [`remove_proxy_privilege`](Self::remove_proxy_privilege).
    pub fn add_proxy_privilege(&mut self, privilege: impl Into<String>) {
        *self.proxy_privileges.entry(privilege.into()).or_insert(0) += 1;
    }

    pub fn remove_proxy_privilege(&mut self, privilege: &str) {
        if let Some(count) = self.proxy_privileges.get_mut(privilege) {
            *count -= 1;
            if *count == 0 {
                self.proxy_privileges.remove(privilege);
            }
        }
    }

    fn role_names(&self) -> Vec<String> {
        let mut names = vec![ANONYMOUS_ROLE.to_string()];
        if let Some(user) = &self.user {
            names.push(AUTHENTICATED_ROLE.to_string());
            names.extend(user.roles.iter().cloned());
        }
        names
    }
}
