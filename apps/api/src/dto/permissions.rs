use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warrant_application::CreatePermissionInput;
use warrant_domain::{Owned, Permission};

/// Incoming payload for permission creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Owners in addition to the caller, who is always added.
    #[serde(default)]
    pub owners: Vec<String>,
}

/// Incoming payload for permission description updates.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-request.ts"
)]
pub struct UpdatePermissionRequest {
    pub description: String,
}

/// Owners to add to or remove from a permission.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-owners-request.ts"
)]
pub struct PermissionOwnersRequest {
    pub owners: Vec<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub name: String,
    pub description: String,
    pub owners: Vec<String>,
    pub roles: Vec<String>,
}

impl From<CreatePermissionRequest> for CreatePermissionInput {
    fn from(request: CreatePermissionRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            owners: request.owners.into(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(permission: Permission) -> Self {
        Self {
            name: permission.name().to_owned(),
            description: permission.description().to_owned(),
            owners: permission.owners().to_vec(),
            roles: permission.roles().to_vec(),
        }
    }
}
