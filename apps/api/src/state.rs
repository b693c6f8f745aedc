use axum::http::HeaderName;
use warrant_application::{PermissionResolver, PermissionService, RoleService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub permission_service: PermissionService,
    pub role_service: RoleService,
    pub permission_resolver: PermissionResolver,
    pub actor_header: HeaderName,
}
