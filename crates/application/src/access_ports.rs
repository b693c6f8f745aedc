mod group_source;
mod inputs;
mod store;

pub use group_source::GroupSource;
pub use inputs::{CreatePermissionInput, CreateRoleInput, ModifyRoleInput};
pub use store::AccessStore;
