use std::sync::Arc;

use tracing::info;
use warrant_core::{Actor, AppError, AppResult, IdentifierSet};
use warrant_domain::{Permission, ensure_not_self_removal, ensure_owner};

use crate::{AccessStore, CreatePermissionInput, MutationLock};

/// Application service for ownership-gated permission administration.
#[derive(Clone)]
pub struct PermissionService {
    store: Arc<dyn AccessStore>,
    lock: MutationLock,
}

impl PermissionService {
    /// Creates a new service from the store and the shared mutation lock.
    #[must_use]
    pub fn new(store: Arc<dyn AccessStore>, lock: MutationLock) -> Self {
        Self { store, lock }
    }

    /// Creates a permission owned by the actor and any requested owners.
    pub async fn create_permission(
        &self,
        actor: &Actor,
        input: CreatePermissionInput,
    ) -> AppResult<Permission> {
        let _guard = self.lock.acquire().await;

        let permission = Permission::new(
            input.name,
            input.description,
            actor.subject(),
            input.owners,
        )?;
        self.store.create_permission(permission.clone()).await?;

        info!(
            actor = actor.subject(),
            permission = permission.name(),
            "created permission"
        );
        Ok(permission)
    }

    /// Returns one permission, if present.
    pub async fn get_permission(&self, name: &str) -> AppResult<Option<Permission>> {
        self.store.find_permission(name).await
    }

    /// Lists all permissions.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.store.list_permissions().await
    }

    /// Replaces the description of an owned permission.
    pub async fn update_permission(
        &self,
        actor: &Actor,
        name: &str,
        description: String,
    ) -> AppResult<Permission> {
        let _guard = self.lock.acquire().await;

        let mut permission = self.load_permission(name).await?;
        ensure_owner(actor, &permission)?;

        permission.set_description(description);
        self.store.update_permission(permission.clone()).await?;

        info!(actor = actor.subject(), permission = name, "updated permission");
        Ok(permission)
    }

    /// Adds owners to an owned permission.
    pub async fn add_permission_owners(
        &self,
        actor: &Actor,
        name: &str,
        owners: IdentifierSet,
    ) -> AppResult<Permission> {
        owners.ensure_non_blank("owner")?;
        let _guard = self.lock.acquire().await;

        let mut permission = self.load_permission(name).await?;
        ensure_owner(actor, &permission)?;

        permission.add_owners(&owners);
        self.store.update_permission(permission.clone()).await?;

        info!(
            actor = actor.subject(),
            permission = name,
            owners = ?owners.to_vec(),
            "added permission owners"
        );
        Ok(permission)
    }

    /// Removes owners other than the actor from an owned permission.
    pub async fn remove_permission_owners(
        &self,
        actor: &Actor,
        name: &str,
        owners: IdentifierSet,
    ) -> AppResult<Permission> {
        let _guard = self.lock.acquire().await;

        let mut permission = self.load_permission(name).await?;
        ensure_owner(actor, &permission)?;
        ensure_not_self_removal(actor, &permission, &owners)?;

        permission.remove_owners(&owners);
        self.store.update_permission(permission.clone()).await?;

        info!(
            actor = actor.subject(),
            permission = name,
            owners = ?owners.to_vec(),
            "removed permission owners"
        );
        Ok(permission)
    }

    /// Deletes an owned permission that no role grants any more.
    pub async fn delete_permission(&self, actor: &Actor, name: &str) -> AppResult<()> {
        let _guard = self.lock.acquire().await;

        let permission = self.load_permission(name).await?;
        ensure_owner(actor, &permission)?;
        permission.ensure_detached()?;

        self.store.delete_permission(name).await?;

        info!(actor = actor.subject(), permission = name, "deleted permission");
        Ok(())
    }

    async fn load_permission(&self, name: &str) -> AppResult<Permission> {
        self.store
            .find_permission(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission '{name}' does not exist")))
    }
}
