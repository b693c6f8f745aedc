use serde::{Deserialize, Serialize};
use warrant_core::{AppResult, IdentifierSet, NonEmptyString};

use crate::ownership::{EntityKind, Owned};

/// Permission, user and group references carried by a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMembers {
    /// Granted permission names.
    pub permissions: IdentifierSet,
    /// Directly assigned user identifiers.
    pub users: IdentifierSet,
    /// Group identifiers granted the role.
    pub groups: IdentifierSet,
}

impl RoleMembers {
    /// Returns whether no member of any kind is referenced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.users.is_empty() && self.groups.is_empty()
    }

    /// Rejects blank identifiers of any member kind.
    pub fn ensure_non_blank(&self) -> AppResult<()> {
        self.permissions.ensure_non_blank("permission")?;
        self.users.ensure_non_blank("user")?;
        self.groups.ensure_non_blank("group")
    }

    /// Returns members referenced here but absent from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self {
            permissions: self.permissions.difference(&other.permissions),
            users: self.users.difference(&other.users),
            groups: self.groups.difference(&other.groups),
        }
    }

    /// Returns members referenced both here and in `other`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.difference(&self.difference(other))
    }
}

/// Named bundle of permissions assigned to users and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: String,
    description: String,
    owners: IdentifierSet,
    members: RoleMembers,
}

impl Role {
    /// Creates a new role owned by `creator` plus any requested owners.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        creator: &str,
        owners: IdentifierSet,
        members: RoleMembers,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        owners.ensure_non_blank("owner")?;
        members.ensure_non_blank()?;
        let mut owners = owners;
        owners.add([creator]);

        Ok(Self {
            name: name.into(),
            description: description.into(),
            owners,
            members,
        })
    }

    /// Rebuilds a role from persisted state.
    #[must_use]
    pub fn from_parts(
        name: String,
        description: String,
        owners: IdentifierSet,
        members: RoleMembers,
    ) -> Self {
        Self {
            name,
            description,
            owners,
            members,
        }
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the full member snapshot.
    #[must_use]
    pub fn members(&self) -> &RoleMembers {
        &self.members
    }

    /// Returns granted permission names.
    #[must_use]
    pub fn permissions(&self) -> &IdentifierSet {
        &self.members.permissions
    }

    /// Returns directly assigned users.
    #[must_use]
    pub fn users(&self) -> &IdentifierSet {
        &self.members.users
    }

    /// Returns groups granted this role.
    #[must_use]
    pub fn groups(&self) -> &IdentifierSet {
        &self.members.groups
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

    /// Adds members of every kind.
    pub fn add_members(&mut self, members: &RoleMembers) {
        self.members.permissions.add(&members.permissions);
        self.members.users.add(&members.users);
        self.members.groups.add(&members.groups);
    }

    /// Removes members of every kind.
    pub fn remove_members(&mut self, members: &RoleMembers) {
        self.members.permissions.remove(&members.permissions);
        self.members.users.remove(&members.users);
        self.members.groups.remove(&members.groups);
    }
}

impl Owned for Role {
    fn kind(&self) -> EntityKind {
        EntityKind::Role
    }

    fn key(&self) -> &str {
        self.name()
    }

    fn owners(&self) -> &IdentifierSet {
        &self.owners
    }
}
