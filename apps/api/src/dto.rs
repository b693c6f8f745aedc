mod common;
mod permissions;
mod principals;
mod roles;

pub use common::HealthResponse;
pub use permissions::{
    CreatePermissionRequest, PermissionOwnersRequest, PermissionResponse,
    UpdatePermissionRequest,
};
pub use principals::{GroupResponse, UserPermissionsResponse, UserResponse};
pub use roles::{
    CreateRoleRequest, ModifyRoleRequest, ReconcileRoleResponse, RoleMembersDto, RoleResponse,
    UpdateRoleRequest,
};
