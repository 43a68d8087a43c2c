//! Capability checks for privileged operations.

use crate::models::{Actor, RoleId};

/// Decides whether an actor holds a capability (on Discord: a role).
pub trait AuthorizationChecker: Send + Sync {
    fn has_capability(&self, actor: &Actor, capability: RoleId) -> bool;
}

/// Scans the role list the platform attached to the event.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleListChecker;

impl AuthorizationChecker for RoleListChecker {
    fn has_capability(&self, actor: &Actor, capability: RoleId) -> bool {
        actor.roles.contains(&capability)
    }
}
