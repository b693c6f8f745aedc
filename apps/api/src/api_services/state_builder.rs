use std::fs;
use std::sync::Arc;

use axum::http::HeaderName;
use tracing::info;
use warrant_application::{
    AccessStore, GroupSource, MutationLock, PermissionResolver, PermissionService, RoleService,
};
use warrant_core::AppError;
use warrant_infrastructure::{
    DirectoryGroupSource, InMemoryAccessStore, PostgresAccessStore, StaticGroupSource,
};

use crate::api_config::{GroupSourceConfig, StoreBackendConfig};
use crate::state::AppState;

use super::connect_and_migrate;

pub async fn build_access_store(
    config: &StoreBackendConfig,
) -> Result<Arc<dyn AccessStore>, AppError> {
    match config {
        StoreBackendConfig::Memory => {
            info!("using in-memory access store");
            Ok(Arc::new(InMemoryAccessStore::new()))
        }
        StoreBackendConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            info!("using postgres access store");
            Ok(Arc::new(PostgresAccessStore::new(pool)))
        }
    }
}

pub fn build_group_source(config: &GroupSourceConfig) -> Result<Arc<dyn GroupSource>, AppError> {
    match config {
        GroupSourceConfig::Static { groups_file: None } => {
            info!("using empty static group source");
            Ok(Arc::new(StaticGroupSource::default()))
        }
        GroupSourceConfig::Static {
            groups_file: Some(path),
        } => {
            let document = fs::read_to_string(path).map_err(|error| {
                AppError::Validation(format!(
                    "failed to read STATIC_GROUPS_FILE '{}': {error}",
                    path.display()
                ))
            })?;
            info!(file = %path.display(), "using static group source");
            Ok(Arc::new(StaticGroupSource::from_json(&document)?))
        }
        GroupSourceConfig::Directory {
            org_url,
            api_token,
            timeout,
        } => {
            info!(org_url = %org_url, timeout_secs = timeout.as_secs(), "using directory group source");
            Ok(Arc::new(DirectoryGroupSource::new(
                org_url.clone(),
                api_token.as_str(),
                *timeout,
            )?))
        }
    }
}

pub fn build_app_state(
    store: Arc<dyn AccessStore>,
    group_source: Arc<dyn GroupSource>,
    actor_header: HeaderName,
) -> AppState {
    let lock = MutationLock::new();

    AppState {
        permission_service: PermissionService::new(store.clone(), lock.clone()),
        role_service: RoleService::new(store.clone(), lock),
        permission_resolver: PermissionResolver::new(store, group_source),
        actor_header,
    }
}
