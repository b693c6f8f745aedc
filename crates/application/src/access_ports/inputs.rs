use warrant_core::IdentifierSet;
use warrant_domain::RoleMembers;

/// Input payload for permission creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Unique permission name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Additional owners besides the creator.
    pub owners: IdentifierSet,
}

/// Input payload for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Additional owners besides the creator.
    pub owners: IdentifierSet,
    /// Initial permissions, users and groups.
    pub members: RoleMembers,
}

/// Owners and members added to or removed from an existing role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifyRoleInput {
    /// Owners to add or remove.
    pub owners: IdentifierSet,
    /// Permissions, users and groups to add or remove.
    pub members: RoleMembers,
}
