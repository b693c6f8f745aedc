use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use warrant_application::AccessStore;
use warrant_core::{AppError, AppResult};
use warrant_domain::{Group, Permission, Role, User};

/// In-memory access store implementation.
///
/// Every operation takes one map lock for its whole duration, so bulk back-link
/// updates are applied to all named records or to none.
#[derive(Debug, Default)]
pub struct InMemoryAccessStore {
    permissions: RwLock<HashMap<String, Permission>>,
    roles: RwLock<HashMap<String, Role>>,
    users: RwLock<HashMap<String, User>>,
    groups: RwLock<HashMap<String, Group>>,
}

impl InMemoryAccessStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_values<T: Clone>(map: &HashMap<String, T>) -> Vec<T> {
    let mut entries: Vec<(&String, &T)> = map.iter().collect();
    entries.sort_by(|left, right| left.0.cmp(right.0));
    entries.into_iter().map(|(_, value)| value.clone()).collect()
}

fn read_all<T: Clone>(map: &HashMap<String, T>, kind: &str, keys: &[String]) -> AppResult<Vec<T>> {
    keys.iter()
        .map(|key| {
            map.get(key)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("{kind} '{key}' does not exist")))
        })
        .collect()
}

#[async_trait]
impl AccessStore for InMemoryAccessStore {
    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        if permissions.contains_key(permission.name()) {
            return Err(AppError::AlreadyExists(format!(
                "permission '{}' already exists",
                permission.name()
            )));
        }

        permissions.insert(permission.name().to_owned(), permission);
        Ok(())
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self.permissions.read().await.get(name).cloned())
    }

    async fn bulk_read_permissions(&self, names: &[String]) -> AppResult<Vec<Permission>> {
        read_all(&*self.permissions.read().await, "permission", names)
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(sorted_values(&*self.permissions.read().await))
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        let Some(stored) = permissions.get_mut(permission.name()) else {
            return Err(AppError::NotFound(format!(
                "permission '{}' does not exist",
                permission.name()
            )));
        };

        *stored = permission;
        Ok(())
    }

    async fn delete_permission(&self, name: &str) -> AppResult<()> {
        self.permissions.write().await.remove(name);
        Ok(())
    }

    async fn add_role_to_permissions(&self, role: &str, names: &[String]) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        if let Some(missing) = names.iter().find(|name| !permissions.contains_key(*name)) {
            return Err(AppError::NotFound(format!(
                "permission '{missing}' does not exist"
            )));
        }

        for name in names {
            if let Some(permission) = permissions.get_mut(name) {
                permission.link_role(role);
            }
        }
        Ok(())
    }

    async fn remove_role_from_permissions(&self, role: &str, names: &[String]) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        for name in names {
            if let Some(permission) = permissions.get_mut(name) {
                permission.unlink_role(role);
            }
        }
        Ok(())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if roles.contains_key(role.name()) {
            return Err(AppError::AlreadyExists(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        roles.insert(role.name().to_owned(), role);
        Ok(())
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(name).cloned())
    }

    async fn bulk_read_roles(&self, names: &[String]) -> AppResult<Vec<Role>> {
        read_all(&*self.roles.read().await, "role", names)
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(sorted_values(&*self.roles.read().await))
    }

    async fn update_role(&self, role: Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let Some(stored) = roles.get_mut(role.name()) else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.name()
            )));
        };

        *stored = role;
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        self.roles.write().await.remove(name);
        Ok(())
    }

    async fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(sorted_values(&*self.users.read().await))
    }

    async fn materialize_user(&self, id: &str) -> AppResult<User> {
        Ok(self
            .users
            .write()
            .await
            .entry(id.to_owned())
            .or_insert_with(|| User::new(id))
            .clone())
    }

    async fn update_user(&self, user: User) -> AppResult<()> {
        let mut users = self.users.write().await;
        let Some(stored) = users.get_mut(user.id()) else {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                user.id()
            )));
        };

        *stored = user;
        Ok(())
    }

    async fn add_role_to_users(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut users = self.users.write().await;
        for id in ids {
            users
                .entry(id.clone())
                .or_insert_with(|| User::new(id.as_str()))
                .link_role(role);
        }
        Ok(())
    }

    async fn remove_role_from_users(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut users = self.users.write().await;
        for id in ids {
            if let Some(user) = users.get_mut(id) {
                user.unlink_role(role);
            }
        }
        Ok(())
    }

    async fn find_group(&self, id: &str) -> AppResult<Option<Group>> {
        Ok(self.groups.read().await.get(id).cloned())
    }

    async fn read_groups(&self, ids: &[String]) -> AppResult<Vec<Group>> {
        let groups = self.groups.read().await;
        Ok(ids.iter().filter_map(|id| groups.get(id).cloned()).collect())
    }

    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        Ok(sorted_values(&*self.groups.read().await))
    }

    async fn materialize_group(&self, id: &str) -> AppResult<Group> {
        Ok(self
            .groups
            .write()
            .await
            .entry(id.to_owned())
            .or_insert_with(|| Group::new(id))
            .clone())
    }

    async fn update_group(&self, group: Group) -> AppResult<()> {
        let mut groups = self.groups.write().await;
        let Some(stored) = groups.get_mut(group.id()) else {
            return Err(AppError::NotFound(format!(
                "group '{}' does not exist",
                group.id()
            )));
        };

        *stored = group;
        Ok(())
    }

    async fn add_role_to_groups(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut groups = self.groups.write().await;
        for id in ids {
            groups
                .entry(id.clone())
                .or_insert_with(|| Group::new(id.as_str()))
                .link_role(role);
        }
        Ok(())
    }

    async fn remove_role_from_groups(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut groups = self.groups.write().await;
        for id in ids {
            if let Some(group) = groups.get_mut(id) {
                group.unlink_role(role);
            }
        }
        Ok(())
    }
}
