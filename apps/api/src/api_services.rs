mod database;
mod state_builder;

pub use database::connect_and_migrate;
pub use state_builder::{build_access_store, build_app_state, build_group_source};
