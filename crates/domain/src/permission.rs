use serde::{Deserialize, Serialize};
use warrant_core::{AppError, AppResult, IdentifierSet, NonEmptyString};

use crate::ownership::{EntityKind, Owned};

/// Named grantable capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    name: String,
    description: String,
    owners: IdentifierSet,
    roles: IdentifierSet,
}

impl Permission {
    /// Creates a new permission owned by `creator` plus any requested owners.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        creator: &str,
        owners: IdentifierSet,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        owners.ensure_non_blank("owner")?;
        let mut owners = owners;
        owners.add([creator]);

        Ok(Self {
            name: name.into(),
            description: description.into(),
            owners,
            roles: IdentifierSet::new(),
        })
    }

    /// Rebuilds a permission from persisted state.
    #[must_use]
    pub fn from_parts(
        name: String,
        description: String,
        owners: IdentifierSet,
        roles: IdentifierSet,
    ) -> Self {
        Self {
            name,
            description,
            owners,
            roles,
        }
    }

    /// Returns the unique permission name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the names of roles currently granting this permission.
    #[must_use]
    pub fn roles(&self) -> &IdentifierSet {
        &self.roles
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Adds owners.
    pub fn add_owners(&mut self, owners: &IdentifierSet) {
        self.owners.add(owners);
    }

    /// Removes owners.
    pub fn remove_owners(&mut self, owners: &IdentifierSet) {
        self.owners.remove(owners);
    }

    /// Records that `role` grants this permission.
    pub fn link_role(&mut self, role: &str) {
        self.roles.add([role]);
    }

    /// Drops the back-reference to `role`.
    pub fn unlink_role(&mut self, role: &str) {
        self.roles.remove([role]);
    }

    /// Fails with a conflict while any role still grants this permission.
    pub fn ensure_detached(&self) -> AppResult<()> {
        if self.roles.is_empty() {
            return Ok(());
        }

        Err(AppError::Conflict(format!(
            "permission '{}' is still granted by roles [{}]",
            self.name,
            self.roles.to_vec().join(", ")
        )))
    }
}

impl Owned for Permission {
    fn kind(&self) -> EntityKind {
        EntityKind::Permission
    }

    fn key(&self) -> &str {
        self.name()
    }

    fn owners(&self) -> &IdentifierSet {
        &self.owners
    }
}
