use axum::Json;
use axum::extract::{Path, State};
use warrant_core::AppError;

use crate::dto::{GroupResponse, UserPermissionsResponse, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .permission_resolver
        .find_user(user_id.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' has no record")))?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn user_permissions_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let permissions = state
        .permission_resolver
        .resolve(user_id.as_str())
        .await?;

    Ok(Json(UserPermissionsResponse::new(user_id, permissions)))
}

pub async fn get_group_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> ApiResult<Json<GroupResponse>> {
    let group = state
        .permission_resolver
        .find_group(group_id.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' has no record")))?;

    Ok(Json(GroupResponse::from(group)))
}
