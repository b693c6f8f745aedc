//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod directory_group_source;
mod in_memory_access_store;
mod postgres_access_store;
mod static_group_source;

pub use directory_group_source::DirectoryGroupSource;
pub use in_memory_access_store::InMemoryAccessStore;
pub use postgres_access_store::PostgresAccessStore;
pub use static_group_source::StaticGroupSource;
