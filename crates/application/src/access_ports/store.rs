use async_trait::async_trait;

use warrant_core::AppResult;
use warrant_domain::{Group, Permission, Role, User};

/// Storage port for permissions, roles, users and groups.
///
/// `find_*` return `Ok(None)` for absent keys. `bulk_read_*` fail with
/// `AppError::NotFound` on the first absent key and return nothing else.
/// `update_*` never insert and `delete_*` succeed for absent keys.
#[async_trait]
pub trait AccessStore: Send + Sync {
    /// Inserts a new permission, failing with `AlreadyExists` on a taken name.
    async fn create_permission(&self, permission: Permission) -> AppResult<()>;

    /// Finds one permission by name.
    async fn find_permission(&self, name: &str) -> AppResult<Option<Permission>>;

    /// Reads every named permission, in request order.
    async fn bulk_read_permissions(&self, names: &[String]) -> AppResult<Vec<Permission>>;

    /// Lists all permissions ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Replaces a stored permission.
    async fn update_permission(&self, permission: Permission) -> AppResult<()>;

    /// Deletes a permission.
    async fn delete_permission(&self, name: &str) -> AppResult<()>;

    /// Adds `role` to the back-references of every named permission.
    async fn add_role_to_permissions(&self, role: &str, names: &[String]) -> AppResult<()>;

    /// Removes `role` from the back-references of every named permission.
    async fn remove_role_from_permissions(&self, role: &str, names: &[String]) -> AppResult<()>;

    /// Inserts a new role, failing with `AlreadyExists` on a taken name.
    async fn create_role(&self, role: Role) -> AppResult<()>;

    /// Finds one role by name.
    async fn find_role(&self, name: &str) -> AppResult<Option<Role>>;

    /// Reads every named role, in request order.
    async fn bulk_read_roles(&self, names: &[String]) -> AppResult<Vec<Role>>;

    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Replaces a stored role.
    async fn update_role(&self, role: Role) -> AppResult<()>;

    /// Deletes a role.
    async fn delete_role(&self, name: &str) -> AppResult<()>;

    /// Finds one user record.
    async fn find_user(&self, id: &str) -> AppResult<Option<User>>;

    /// Lists all user records ordered by id.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Returns the user record, creating an empty one when absent.
    async fn materialize_user(&self, id: &str) -> AppResult<User>;

    /// Replaces a stored user record.
    async fn update_user(&self, user: User) -> AppResult<()>;

    /// Adds `role` to every named user, materializing absent records.
    async fn add_role_to_users(&self, role: &str, ids: &[String]) -> AppResult<()>;

    /// Removes `role` from every named user that has a record.
    async fn remove_role_from_users(&self, role: &str, ids: &[String]) -> AppResult<()>;

    /// Finds one group record.
    async fn find_group(&self, id: &str) -> AppResult<Option<Group>>;

    /// Reads the named groups, skipping ids without a record.
    async fn read_groups(&self, ids: &[String]) -> AppResult<Vec<Group>>;

    /// Lists all group records ordered by id.
    async fn list_groups(&self) -> AppResult<Vec<Group>>;

    /// Returns the group record, creating an empty one when absent.
    async fn materialize_group(&self, id: &str) -> AppResult<Group>;

    /// Replaces a stored group record.
    async fn update_group(&self, group: Group) -> AppResult<()>;

    /// Adds `role` to every named group, materializing absent records.
    async fn add_role_to_groups(&self, role: &str, ids: &[String]) -> AppResult<()>;

    /// Removes `role` from every named group that has a record.
    async fn remove_role_from_groups(&self, role: &str, ids: &[String]) -> AppResult<()>;
}
