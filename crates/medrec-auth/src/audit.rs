//! Privilege check listeners.

use tracing::{debug, info};

use crate::role::User;

/// Notified of every privilege check the authorization gate performs.
pub trait PrivilegeListener: Send + Sync {
    fn privilege_checked(&self, user: Option<&User>, privilege: &str, has_privilege: bool);
}

/// Logs privilege checks. Denials at `info`, grants at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPrivilegeListener;

impl PrivilegeListener for TracingPrivilegeListener {
    fn privilege_checked(&self, user: Option<&User>, privilege: &str, has_privilege: bool) {
        let username = user.map_or("anonymous", |u| u.username.as_str());
        if has_privilege {
            debug!(user = %username, privilege = %privilege, "Privilege granted");
        } else {
            info!(user = %username, privilege = %privilege, "Privilege denied");
        }
    }
}
