//! Warrant API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use tracing::info;
use warrant_core::AppError;

use crate::api_config::{ApiConfig, StoreBackendConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_access_store, build_app_state, build_group_source, connect_and_migrate,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        let StoreBackendConfig::Postgres { database_url } = &config.store_backend else {
            return Err(AppError::Validation(
                "migrate requires STORE_BACKEND=postgres".to_owned(),
            ));
        };
        connect_and_migrate(database_url).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let store = build_access_store(&config.store_backend).await?;
    let group_source = build_group_source(&config.group_source)?;
    let app_state = build_app_state(store, group_source, config.actor_header.clone());
    let app = build_router(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind api listener: {error}")))?;

    info!(%address, "warrant-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
