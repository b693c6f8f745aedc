use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warrant_application::{CreateRoleInput, ModifyRoleInput, ReconcileReport};
use warrant_domain::{Owned, Role, RoleMembers};

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Incoming payload for role description updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub description: String,
}

/// Owners and members to add to or remove from a role.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/modify-role-request.ts"
)]
pub struct ModifyRoleRequest {
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub name: String,
    pub description: String,
    pub owners: Vec<String>,
    pub permissions: Vec<String>,
    pub users: Vec<String>,
    pub groups: Vec<String>,
}

/// Permissions, users and groups touched by a reconciliation pass.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-members-dto.ts"
)]
pub struct RoleMembersDto {
    pub permissions: Vec<String>,
    pub users: Vec<String>,
    pub groups: Vec<String>,
}

/// Back-links repaired for a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reconcile-role-response.ts"
)]
pub struct ReconcileRoleResponse {
    pub role: String,
    pub linked: RoleMembersDto,
    pub unlinked: RoleMembersDto,
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(request: CreateRoleRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            owners: request.owners.into(),
            members: RoleMembers {
                permissions: request.permissions.into(),
                users: request.users.into(),
                groups: request.groups.into(),
            },
        }
    }
}

impl From<ModifyRoleRequest> for ModifyRoleInput {
    fn from(request: ModifyRoleRequest) -> Self {
        Self {
            owners: request.owners.into(),
            members: RoleMembers {
                permissions: request.permissions.into(),
                users: request.users.into(),
                groups: request.groups.into(),
            },
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            name: role.name().to_owned(),
            description: role.description().to_owned(),
            owners: role.owners().to_vec(),
            permissions: role.permissions().to_vec(),
            users: role.users().to_vec(),
            groups: role.groups().to_vec(),
        }
    }
}

impl From<RoleMembers> for RoleMembersDto {
    fn from(members: RoleMembers) -> Self {
        Self {
            permissions: members.permissions.to_vec(),
            users: members.users.to_vec(),
            groups: members.groups.to_vec(),
        }
    }
}

impl ReconcileRoleResponse {
    pub fn new(role: String, report: ReconcileReport) -> Self {
        Self {
            role,
            linked: report.linked.into(),
            unlinked: report.unlinked.into(),
        }
    }
}
