use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use warrant_core::{Actor, AppError};

use crate::dto::{
    CreatePermissionRequest, PermissionOwnersRequest, PermissionResponse,
    UpdatePermissionRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .permission_service
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .permission_service
        .create_permission(&actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_service
        .get_permission(name.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("permission '{name}' does not exist")))?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_service
        .update_permission(&actor, name.as_str(), payload.description)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .permission_service
        .delete_permission(&actor, name.as_str())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_permission_owners_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
    Json(payload): Json<PermissionOwnersRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_service
        .add_permission_owners(&actor, name.as_str(), payload.owners.into())
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn remove_permission_owners_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(name): Path<String>,
    Json(payload): Json<PermissionOwnersRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_service
        .remove_permission_owners(&actor, name.as_str(), payload.owners.into())
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}
