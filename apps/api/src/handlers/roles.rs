use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use warrant_core::{Actor, AppError};

use crate::dto::{
    CreateRoleRequest, ModifyRoleRequest, ReconcileRoleResponse, RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.create_role(&actor, payload.into()).await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .get_role(name.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(&actor, name.as_str(), payload.description)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.role_service.delete_role(&actor, name.as_str()).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_role_members_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
    Json(payload): Json<ModifyRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .add_role_members(&actor, name.as_str(), payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn remove_role_members_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
    Json(payload): Json<ModifyRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .remove_role_members(&actor, name.as_str(), payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn reconcile_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
) -> ApiResult<Json<ReconcileRoleResponse>> {
    let report = state
        .role_service
        .reconcile_role(&actor, name.as_str())
        .await?;

    Ok(Json(ReconcileRoleResponse::new(name, report)))
}
