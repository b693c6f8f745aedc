//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod ownership;
mod permission;
mod principal;
mod role;

pub use ownership::{
    EntityKind, Owned, ensure_not_self_removal, ensure_owner, ensure_owner_of_all, is_authorized,
};
pub use permission::Permission;
pub use principal::{Group, User};
pub use role::{Role, RoleMembers};
