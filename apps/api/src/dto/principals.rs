use serde::Serialize;
use ts_rs::TS;
use warrant_core::IdentifierSet;
use warrant_domain::{Group, User};

/// API representation of a stored user record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: String,
    pub roles: Vec<String>,
    /// Directly stored permissions; not consulted by resolution.
    pub permissions: Vec<String>,
}

/// API representation of a stored group record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/group-response.ts"
)]
pub struct GroupResponse {
    pub id: String,
    pub roles: Vec<String>,
}

/// Effective permissions resolved for a user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-permissions-response.ts"
)]
pub struct UserPermissionsResponse {
    pub user_id: String,
    pub permissions: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_owned(),
            roles: user.roles().to_vec(),
            permissions: user.permissions().to_vec(),
        }
    }
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id().to_owned(),
            roles: group.roles().to_vec(),
        }
    }
}

impl UserPermissionsResponse {
    pub fn new(user_id: String, permissions: IdentifierSet) -> Self {
        Self {
            user_id,
            permissions: permissions.into_iter().collect(),
        }
    }
}
