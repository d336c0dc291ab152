//! Roles, users and the role directory.

use std::collections::{HashSet, VecDeque};

use dashmap::DashMap;
use medrec_core::generate_uuid;
use serde::{Deserialize, Serialize};

use crate::privileges::SUPERUSER_ROLE;

/// A named bundle of privileges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role name.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Privileges granted directly by this role.
    #[serde(default)]
    pub privileges: HashSet<String>,

    /// Roles whose privileges this role also grants.
    #[serde(default)]
    pub inherited_roles: Vec<String>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            privileges: HashSet::new(),
            inherited_roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_privilege(mut self, privilege: impl Into<String>) -> Self {
        self.privileges.insert(privilege.into());
        self
    }

    #[must_use]
    pub fn with_privileges<I, S>(mut self, privileges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.privileges
            .extend(privileges.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn inheriting(mut self, role: impl Into<String>) -> Self {
        self.inherited_roles.push(role.into());
        self
    }

    #[must_use]
    pub fn inheriting_all<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inherited_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn is_superuser(&self) -> bool {
        self.name == SUPERUSER_ROLE
    }

    /// Whether this role grants `privilege` directly. The superuser role
    /// grants everything.
    pub fn has_privilege(&self, privilege: &str) -> bool {
        self.is_superuser() || self.privileges.contains(privilege)
    }
}

/// A system account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub username: String,
    /// Directly assigned role names.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(user_id: i32, username: impl Into<String>) -> Self {
        Self {
            user_id,
            uuid: generate_uuid(),
            username: username.into(),
            roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

/// Concurrent lookup of roles by name.
#[derive(Debug, Default)]
pub struct RoleDirectory {
    roles: DashMap<String, Role>,
}

impl RoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let directory = Self::new();
        for role in roles {
            directory.insert(role);
        }
        directory
    }

    /// Insert or replace a role.
    pub fn insert(&self, role: Role) {
        self.roles.insert(role.name.clone(), role);
    }

    pub fn get(&self, name: &str) -> Option<Role> {
        self.roles.get(name).map(|r| r.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Role> {
        self.roles.remove(name).map(|(_, role)| role)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Expand `names` to the full set of role names they grant, following
    /// inheritance transitively. Undefined names are kept but contribute
    /// nothing further. Cycles are visited once.
    pub fn expand<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut order = Vec::new();
        let mut queue: VecDeque<String> = names.into_iter().cloned().collect();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(role) = self.roles.get(&name) {
                queue.extend(role.inherited_roles.iter().cloned());
            }
            order.push(name);
        }
        order
    }

    /// Whether any of `names`, or a role they inherit, grants `privilege`.
    pub fn grants<'a, I>(&self, names: I, privilege: &str) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.expand(names).iter().any(|name| {
            self.roles
                .get(name)
                .is_some_and(|role| role.has_privilege(privilege))
        })
    }

    /// Whether any of `names`, or a role they inherit, is the superuser role.
    pub fn includes_superuser<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.expand(names).iter().any(|name| name == SUPERUSER_ROLE)
    }

    /// All privileges directly or indirectly granted by `names`.
    pub fn privileges_of<'a, I>(&self, names: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut privileges = HashSet::new();
        for name in self.expand(names) {
            if let Some(role) = self.roles.get(&name) {
                privileges.extend(role.privileges.iter().cloned());
            }
        }
        privileges
    }
}
