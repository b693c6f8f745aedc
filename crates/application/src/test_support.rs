use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use warrant_core::{Actor, AppError, AppResult};
use warrant_domain::{Group, Permission, Role, User};

use crate::{AccessStore, GroupSource};

pub(crate) fn actor(subject: &str) -> Actor {
    Actor::new(subject).unwrap_or_else(|_| unreachable!())
}

pub(crate) fn names(values: &[&str]) -> warrant_core::IdentifierSet {
    values.iter().copied().collect()
}

#[derive(Default)]
pub(crate) struct FakeAccessStore {
    permissions: Mutex<BTreeMap<String, Permission>>,
    roles: Mutex<BTreeMap<String, Role>>,
    users: Mutex<BTreeMap<String, User>>,
    groups: Mutex<BTreeMap<String, Group>>,
}

#[async_trait]
impl AccessStore for FakeAccessStore {
    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        if permissions.contains_key(permission.name()) {
            return Err(AppError::AlreadyExists(permission.name().to_owned()));
        }
        permissions.insert(permission.name().to_owned(), permission);
        Ok(())
    }

    async fn find_permission(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self.permissions.lock().await.get(name).cloned())
    }

    async fn bulk_read_permissions(&self, names: &[String]) -> AppResult<Vec<Permission>> {
        let permissions = self.permissions.lock().await;
        names
            .iter()
            .map(|name| {
                permissions
                    .get(name)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(name.clone()))
            })
            .collect()
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.permissions.lock().await.values().cloned().collect())
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        let Some(slot) = permissions.get_mut(permission.name()) else {
            return Err(AppError::NotFound(permission.name().to_owned()));
        };
        *slot = permission;
        Ok(())
    }

    async fn delete_permission(&self, name: &str) -> AppResult<()> {
        self.permissions.lock().await.remove(name);
        Ok(())
    }

    async fn add_role_to_permissions(&self, role: &str, names: &[String]) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        for name in names {
            let permission = permissions
                .get_mut(name)
                .ok_or_else(|| AppError::NotFound(name.clone()))?;
            permission.link_role(role);
        }
        Ok(())
    }

    async fn remove_role_from_permissions(&self, role: &str, names: &[String]) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        for name in names {
            if let Some(permission) = permissions.get_mut(name) {
                permission.unlink_role(role);
            }
        }
        Ok(())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if roles.contains_key(role.name()) {
            return Err(AppError::AlreadyExists(role.name().to_owned()));
        }
        roles.insert(role.name().to_owned(), role);
        Ok(())
    }

    async fn find_role(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.lock().await.get(name).cloned())
    }

    async fn bulk_read_roles(&self, names: &[String]) -> AppResult<Vec<Role>> {
        let roles = self.roles.lock().await;
        names
            .iter()
            .map(|name| {
                roles
                    .get(name)
                    .cloned()
                    .ok_or_else(|| AppError::NotFound(name.clone()))
            })
            .collect()
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.values().cloned().collect())
    }

    async fn update_role(&self, role: Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let Some(slot) = roles.get_mut(role.name()) else {
            return Err(AppError::NotFound(role.name().to_owned()));
        };
        *slot = role;
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        self.roles.lock().await.remove(name);
        Ok(())
    }

    async fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(id).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().await.values().cloned().collect())
    }

    async fn materialize_user(&self, id: &str) -> AppResult<User> {
        Ok(self
            .users
            .lock()
            .await
            .entry(id.to_owned())
            .or_insert_with(|| User::new(id))
            .clone())
    }

    async fn update_user(&self, user: User) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let Some(slot) = users.get_mut(user.id()) else {
            return Err(AppError::NotFound(user.id().to_owned()));
        };
        *slot = user;
        Ok(())
    }

    async fn add_role_to_users(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut users = self.users.lock().await;
        for id in ids {
            users
                .entry(id.clone())
                .or_insert_with(|| User::new(id.as_str()))
                .link_role(role);
        }
        Ok(())
    }

    async fn remove_role_from_users(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut users = self.users.lock().await;
        for id in ids {
            if let Some(user) = users.get_mut(id) {
                user.unlink_role(role);
            }
        }
        Ok(())
    }

    async fn find_group(&self, id: &str) -> AppResult<Option<Group>> {
        Ok(self.groups.lock().await.get(id).cloned())
    }

    async fn read_groups(&self, ids: &[String]) -> AppResult<Vec<Group>> {
        let groups = self.groups.lock().await;
        Ok(ids.iter().filter_map(|id| groups.get(id).cloned()).collect())
    }

    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        Ok(self.groups.lock().await.values().cloned().collect())
    }

    async fn materialize_group(&self, id: &str) -> AppResult<Group> {
        Ok(self
            .groups
            .lock()
            .await
            .entry(id.to_owned())
            .or_insert_with(|| Group::new(id))
            .clone())
    }

    async fn update_group(&self, group: Group) -> AppResult<()> {
        let mut groups = self.groups.lock().await;
        let Some(slot) = groups.get_mut(group.id()) else {
            return Err(AppError::NotFound(group.id().to_owned()));
        };
        *slot = group;
        Ok(())
    }

    async fn add_role_to_groups(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut groups = self.groups.lock().await;
        for id in ids {
            groups
                .entry(id.clone())
                .or_insert_with(|| Group::new(id.as_str()))
                .link_role(role);
        }
        Ok(())
    }

    async fn remove_role_from_groups(&self, role: &str, ids: &[String]) -> AppResult<()> {
        let mut groups = self.groups.lock().await;
        for id in ids {
            if let Some(group) = groups.get_mut(id) {
                group.unlink_role(role);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeGroupSource {
    pub(crate) memberships: HashMap<String, Vec<String>>,
    pub(crate) failing: bool,
}

#[async_trait]
impl GroupSource for FakeGroupSource {
    async fn groups_for_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        if self.failing {
            return Err(AppError::LookupFailed("directory unavailable".to_owned()));
        }

        Ok(self
            .memberships
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
