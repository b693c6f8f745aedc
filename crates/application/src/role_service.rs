use std::sync::Arc;

use tracing::info;
use warrant_core::{Actor, AppError, AppResult};
use warrant_domain::{Role, RoleMembers, ensure_not_self_removal, ensure_owner, ensure_owner_of_all};

use crate::{
    AccessStore, CreateRoleInput, MembershipSynchronizer, ModifyRoleInput, MutationLock,
    ReconcileReport,
};

/// Application service for ownership-gated role administration.
///
/// Every mutation runs under the shared [`MutationLock`]: ownership checks,
/// the role write and back-link synchronization happen as one uninterrupted
/// sequence with respect to other mutations.
#[derive(Clone)]
pub struct RoleService {
    store: Arc<dyn AccessStore>,
    synchronizer: MembershipSynchronizer,
    lock: MutationLock,
}

impl RoleService {
    /// Creates a new service from the store and the shared mutation lock.
    #[must_use]
    pub fn new(store: Arc<dyn AccessStore>, lock: MutationLock) -> Self {
        Self {
            synchronizer: MembershipSynchronizer::new(store.clone()),
            store,
            lock,
        }
    }

    /// Creates a role and links it to its initial members.
    ///
    /// Every initial permission must exist and be owned by the actor.
    pub async fn create_role(&self, actor: &Actor, input: CreateRoleInput) -> AppResult<Role> {
        let _guard = self.lock.acquire().await;

        let role = Role::new(
            input.name,
            input.description,
            actor.subject(),
            input.owners,
            input.members,
        )?;
        if self.store.find_role(role.name()).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "role '{}' already exists",
                role.name()
            )));
        }
        self.authorize_permission_grants(actor, role.members()).await?;

        self.store.create_role(role.clone()).await?;
        self.synchronizer
            .link_role(role.name(), role.members())
            .await?;

        info!(actor = actor.subject(), role = role.name(), "created role");
        Ok(role)
    }

    /// Returns one role, if present.
    pub async fn get_role(&self, name: &str) -> AppResult<Option<Role>> {
        self.store.find_role(name).await
    }

    /// Lists all roles.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.store.list_roles().await
    }

    /// Replaces the description of an owned role.
    pub async fn update_role(
        &self,
        actor: &Actor,
        name: &str,
        description: String,
    ) -> AppResult<Role> {
        let _guard = self.lock.acquire().await;

        let mut role = self.load_role(name).await?;
        ensure_owner(actor, &role)?;

        role.set_description(description);
        self.store.update_role(role.clone()).await?;

        info!(actor = actor.subject(), role = name, "updated role");
        Ok(role)
    }

    /// Adds owners and members to an owned role.
    ///
    /// Only permissions not yet granted by the role are checked for existence
    /// and actor ownership.
    pub async fn add_role_members(
        &self,
        actor: &Actor,
        name: &str,
        input: ModifyRoleInput,
    ) -> AppResult<Role> {
        input.owners.ensure_non_blank("owner")?;
        input.members.ensure_non_blank()?;
        let _guard = self.lock.acquire().await;

        let mut role = self.load_role(name).await?;
        ensure_owner(actor, &role)?;

        let added = input.members.difference(role.members());
        self.authorize_permission_grants(actor, &added).await?;

        role.add_owners(&input.owners);
        role.add_members(&added);
        self.store.update_role(role.clone()).await?;
        self.synchronizer.link_role(name, &added).await?;

        info!(
            actor = actor.subject(),
            role = name,
            owners = ?input.owners.to_vec(),
            added = ?added,
            "added role members"
        );
        Ok(role)
    }

    /// Removes owners other than the actor and members from an owned role.
    pub async fn remove_role_members(
        &self,
        actor: &Actor,
        name: &str,
        input: ModifyRoleInput,
    ) -> AppResult<Role> {
        let _guard = self.lock.acquire().await;

        let mut role = self.load_role(name).await?;
        ensure_owner(actor, &role)?;
        ensure_not_self_removal(actor, &role, &input.owners)?;

        let removed = input.members.intersection(role.members());
        role.remove_owners(&input.owners);
        role.remove_members(&removed);
        self.store.update_role(role.clone()).await?;
        self.synchronizer.unlink_role(name, &removed).await?;

        info!(
            actor = actor.subject(),
            role = name,
            owners = ?input.owners.to_vec(),
            removed = ?removed,
            "removed role members"
        );
        Ok(role)
    }

    /// Deletes an owned role and unlinks every member it referenced.
    pub async fn delete_role(&self, actor: &Actor, name: &str) -> AppResult<()> {
        let _guard = self.lock.acquire().await;

        let role = self.load_role(name).await?;
        ensure_owner(actor, &role)?;

        self.store.delete_role(name).await?;
        self.synchronizer.unlink_role(name, role.members()).await?;

        info!(actor = actor.subject(), role = name, "deleted role");
        Ok(())
    }

    /// Repairs the back-links of one role.
    ///
    /// Existing roles may only be reconciled by their owners. References to a
    /// role that no longer exists have no owner to check and are stripped for
    /// any authenticated actor.
    pub async fn reconcile_role(&self, actor: &Actor, name: &str) -> AppResult<ReconcileReport> {
        let _guard = self.lock.acquire().await;

        let role = self.store.find_role(name).await?;
        if let Some(role) = &role {
            ensure_owner(actor, role)?;
        }

        let report = self.synchronizer.reconcile(name, role.as_ref()).await?;

        info!(
            actor = actor.subject(),
            role = name,
            clean = report.is_clean(),
            "reconciled role"
        );
        Ok(report)
    }

    async fn authorize_permission_grants(
        &self,
        actor: &Actor,
        members: &RoleMembers,
    ) -> AppResult<()> {
        if members.permissions.is_empty() {
            return Ok(());
        }

        let permissions = self
            .store
            .bulk_read_permissions(&members.permissions.to_vec())
            .await?;
        ensure_owner_of_all(actor, &permissions)
    }

    async fn load_role(&self, name: &str) -> AppResult<Role> {
        self.store
            .find_role(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' does not exist")))
    }
}
