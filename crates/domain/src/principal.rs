use serde::{Deserialize, Serialize};
use warrant_core::IdentifierSet;

/// Locally tracked user with directly assigned roles.
///
/// Records are materialized the first time a role names the user and are never
/// removed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: String,
    roles: IdentifierSet,
    permissions: IdentifierSet,
}

impl User {
    /// Creates a user record with no roles.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: IdentifierSet::new(),
            permissions: IdentifierSet::new(),
        }
    }

    /// Rebuilds a user from persisted state.
    #[must_use]
    pub fn from_parts(id: String, roles: IdentifierSet, permissions: IdentifierSet) -> Self {
        Self {
            id,
            roles,
            permissions,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns directly assigned role names.
    #[must_use]
    pub fn roles(&self) -> &IdentifierSet {
        &self.roles
    }

    /// Returns the denormalized permission field.
    ///
    /// Resolution never reads this; effective permissions come from roles.
    #[must_use]
    pub fn permissions(&self) -> &IdentifierSet {
        &self.permissions
    }

    /// Records a direct role assignment.
    pub fn link_role(&mut self, role: &str) {
        self.roles.add([role]);
    }

    /// Drops a direct role assignment.
    pub fn unlink_role(&mut self, role: &str) {
        self.roles.remove([role]);
    }
}

/// Locally tracked directory group with granted roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: String,
    roles: IdentifierSet,
}

impl Group {
    /// Creates a group record with no roles.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: IdentifierSet::new(),
        }
    }

    /// Rebuilds a group from persisted state.
    #[must_use]
    pub fn from_parts(id: String, roles: IdentifierSet) -> Self {
        Self { id, roles }
    }

    /// Returns the group identifier as known to the group source.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns role names granted to the group.
    #[must_use]
    pub fn roles(&self) -> &IdentifierSet {
        &self.roles
    }

    /// Records a role grant.
    pub fn link_role(&mut self, role: &str) {
        self.roles.add([role]);
    }

    /// Drops a role grant.
    pub fn unlink_role(&mut self, role: &str) {
        self.roles.remove([role]);
    }
}
