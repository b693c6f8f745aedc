use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use warrant_application::AccessStore;
use warrant_core::{AppError, AppResult, IdentifierSet};
use warrant_domain::{Group, Permission, Role, RoleMembers, User};

mod permissions;
mod principals;
mod roles;

/// PostgreSQL-backed access store.
///
/// Identifier sets are stored as `TEXT[]` columns. Back-link updates are single
/// statements and therefore apply to every named row or to none.
#[derive(Clone)]
pub struct PostgresAccessStore {
    pool: PgPool,
}

impl PostgresAccessStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
struct PermissionRow {
    name: String,
    description: String,
    owners: Vec<String>,
    roles: Vec<String>,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Permission::from_parts(
            row.name,
            row.description,
            IdentifierSet::from(row.owners),
            IdentifierSet::from(row.roles),
        )
    }
}

#[derive(Debug, Clone, FromRow)]
struct RoleRow {
    name: String,
    description: String,
    owners: Vec<String>,
    permissions: Vec<String>,
    users: Vec<String>,
    groups: Vec<String>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role::from_parts(
            row.name,
            row.description,
            IdentifierSet::from(row.owners),
            RoleMembers {
                permissions: IdentifierSet::from(row.permissions),
                users: IdentifierSet::from(row.users),
                groups: IdentifierSet::from(row.groups),
            },
        )
    }
}

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: String,
    roles: Vec<String>,
    permissions: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_parts(
            row.id,
            IdentifierSet::from(row.roles),
            IdentifierSet::from(row.permissions),
        )
    }
}

#[derive(Debug, Clone, FromRow)]
struct GroupRow {
    id: String,
    roles: Vec<String>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group::from_parts(row.id, IdentifierSet::from(row.roles))
    }
}

/// Orders fetched rows by the requested keys and fails on the first key
/// without a row. A key requested twice yields its row twice.
fn in_request_order<T: Clone>(
    rows: Vec<T>,
    keys: &[String],
    key_of: impl Fn(&T) -> &str,
    kind: &str,
) -> AppResult<Vec<T>> {
    let by_key: HashMap<&str, &T> = rows.iter().map(|row| (key_of(row), row)).collect();

    keys.iter()
        .map(|key| {
            by_key
                .get(key.as_str())
                .map(|row| (*row).clone())
                .ok_or_else(|| AppError::NotFound(format!("{kind} '{key}' does not exist")))
        })
        .collect()
}

fn map_unique_violation(error: sqlx::Error, kind: &str, key: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::AlreadyExists(format!("{kind} '{key}' already exists"));
    }

    AppError::Internal(format!("failed to create {kind}: {error}"))
}

#[async_trait]
impl AccessStore for PostgresAccessStore {
    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        self.create_permission_impl(permission).await
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<Permission>> {
        self.find_permission_impl(name).await
    }

    async fn bulk_read_permissions(&self, names: &[String]) -> AppResult<Vec<Permission>> {
        self.bulk_read_permissions_impl(names).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.list_permissions_impl().await
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<()> {
        self.update_permission_impl(permission).await
    }

    async fn delete_permission(&self, name: &str) -> AppResult<()> {
        self.delete_permission_impl(name).await
    }

    async fn add_role_to_permissions(&self, role: &str, names: &[String]) -> AppResult<()> {
        self.add_role_to_permissions_impl(role, names).await
    }

    async fn remove_role_from_permissions(&self, role: &str, names: &[String]) -> AppResult<()> {
        self.remove_role_from_permissions_impl(role, names).await
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        self.create_role_impl(role).await
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<Role>> {
        self.find_role_impl(name).await
    }

    async fn bulk_read_roles(&self, names: &[String]) -> AppResult<Vec<Role>> {
        self.bulk_read_roles_impl(names).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn update_role(&self, role: Role) -> AppResult<()> {
        self.update_role_impl(role).await
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        self.delete_role_impl(name).await
    }

    async fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        self.find_user_impl(id).await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.list_users_impl().await
    }

    async fn materialize_user(&self, id: &str) -> AppResult<User> {
        self.materialize_user_impl(id).await
    }

    async fn update_user(&self, user: User) -> AppResult<()> {
        self.update_user_impl(user).await
    }

    async fn add_role_to_users(&self, role: &str, ids: &[String]) -> AppResult<()> {
        self.add_role_to_users_impl(role, ids).await
    }

    async fn remove_role_from_users(&self, role: &str, ids: &[String]) -> AppResult<()> {
        self.remove_role_from_users_impl(role, ids).await
    }

    async fn find_group(&self, id: &str) -> AppResult<Option<Group>> {
        self.find_group_impl(id).await
    }

    async fn read_groups(&self, ids: &[String]) -> AppResult<Vec<Group>> {
        self.read_groups_impl(ids).await
    }

    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        self.list_groups_impl().await
    }

    async fn materialize_group(&self, id: &str) -> AppResult<Group> {
        self.materialize_group_impl(id).await
    }

    async fn update_group(&self, group: Group) -> AppResult<()> {
        self.update_group_impl(group).await
    }

    async fn add_role_to_groups(&self, role: &str, ids: &[String]) -> AppResult<()> {
        self.add_role_to_groups_impl(role, ids).await
    }

    async fn remove_role_from_groups(&self, role: &str, ids: &[String]) -> AppResult<()> {
        self.remove_role_from_groups_impl(role, ids).await
    }
}

#[cfg(test)]
mod tests;
