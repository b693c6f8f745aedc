//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod membership_synchronizer;
mod mutation_lock;
mod permission_resolver;
mod permission_service;
mod role_service;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AccessStore, CreatePermissionInput, CreateRoleInput, GroupSource, ModifyRoleInput,
};
pub use membership_synchronizer::{MembershipSynchronizer, ReconcileReport};
pub use mutation_lock::MutationLock;
pub use permission_resolver::PermissionResolver;
pub use permission_service::PermissionService;
pub use role_service::RoleService;
