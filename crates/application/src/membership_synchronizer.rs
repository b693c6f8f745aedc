use std::sync::Arc;

use tracing::warn;
use warrant_core::{AppResult, IdentifierSet};
use warrant_domain::{Role, RoleMembers};

use crate::AccessStore;

/// Back-links repaired by a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Members that were missing the role name and received it.
    pub linked: RoleMembers,
    /// Records that referenced the role without being members and lost it.
    pub unlinked: RoleMembers,
}

impl ReconcileReport {
    /// Returns whether the pass changed nothing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.linked.is_empty() && self.unlinked.is_empty()
    }
}

/// Maintains the `roles` back-references on permissions, users and groups.
///
/// Each step is a separate store call. A failure part way through leaves the
/// earlier steps applied; [`MembershipSynchronizer::reconcile`] repairs that.
#[derive(Clone)]
pub struct MembershipSynchronizer {
    store: Arc<dyn AccessStore>,
}

impl MembershipSynchronizer {
    /// Creates a synchronizer over the store.
    #[must_use]
    pub fn new(store: Arc<dyn AccessStore>) -> Self {
        Self { store }
    }

    /// Adds the role name to every referenced member.
    pub async fn link_role(&self, role: &str, members: &RoleMembers) -> AppResult<()> {
        if !members.permissions.is_empty() {
            self.store
                .add_role_to_permissions(role, &members.permissions.to_vec())
                .await?;
        }
        if !members.users.is_empty() {
            self.store
                .add_role_to_users(role, &members.users.to_vec())
                .await?;
        }
        if !members.groups.is_empty() {
            self.store
                .add_role_to_groups(role, &members.groups.to_vec())
                .await?;
        }

        Ok(())
    }

    /// Removes the role name from every referenced member.
    pub async fn unlink_role(&self, role: &str, members: &RoleMembers) -> AppResult<()> {
        if !members.permissions.is_empty() {
            self.store
                .remove_role_from_permissions(role, &members.permissions.to_vec())
                .await?;
        }
        if !members.users.is_empty() {
            self.store
                .remove_role_from_users(role, &members.users.to_vec())
                .await?;
        }
        if !members.groups.is_empty() {
            self.store
                .remove_role_from_groups(role, &members.groups.to_vec())
                .await?;
        }

        Ok(())
    }

    /// Re-derives every back-link of `role_name` from the stored role.
    ///
    /// `role` is the current record, or `None` when the role no longer exists,
    /// in which case every remaining reference is stripped. Running the pass
    /// twice leaves the second report clean.
    pub async fn reconcile(
        &self,
        role_name: &str,
        role: Option<&Role>,
    ) -> AppResult<ReconcileReport> {
        let permissions = self.store.list_permissions().await?;
        let existing_permissions: IdentifierSet = permissions
            .iter()
            .map(|permission| permission.name().to_owned())
            .collect();

        let linked_now = RoleMembers {
            permissions: permissions
                .iter()
                .filter(|permission| permission.roles().contains(role_name))
                .map(|permission| permission.name().to_owned())
                .collect(),
            users: self
                .store
                .list_users()
                .await?
                .iter()
                .filter(|user| user.roles().contains(role_name))
                .map(|user| user.id().to_owned())
                .collect(),
            groups: self
                .store
                .list_groups()
                .await?
                .iter()
                .filter(|group| group.roles().contains(role_name))
                .map(|group| group.id().to_owned())
                .collect(),
        };

        let expected = role.map(|role| role.members().clone()).unwrap_or_default();

        let mut missing = expected.difference(&linked_now);
        let dangling_permissions = missing.permissions.difference(&existing_permissions);
        if !dangling_permissions.is_empty() {
            warn!(
                role = role_name,
                permissions = ?dangling_permissions.to_vec(),
                "role grants permissions that no longer exist"
            );
            missing.permissions.remove(&dangling_permissions);
        }
        let stale = linked_now.difference(&expected);

        self.link_role(role_name, &missing).await?;
        self.unlink_role(role_name, &stale).await?;

        let report = ReconcileReport {
            linked: missing,
            unlinked: stale,
        };
        if !report.is_clean() {
            warn!(role = role_name, report = ?report, "repaired role back-links");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests;
