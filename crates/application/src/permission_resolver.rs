use std::sync::Arc;

use tracing::{debug, warn};
use warrant_core::{AppError, AppResult, IdentifierSet};
use warrant_domain::{Group, User};

use crate::{AccessStore, GroupSource};

/// Read-side service computing a user's effective permissions.
///
/// Resolution needs no actor and never writes.
#[derive(Clone)]
pub struct PermissionResolver {
    store: Arc<dyn AccessStore>,
    group_source: Arc<dyn GroupSource>,
}

impl PermissionResolver {
    /// Creates a resolver from the store and the external group source.
    #[must_use]
    pub fn new(store: Arc<dyn AccessStore>, group_source: Arc<dyn GroupSource>) -> Self {
        Self {
            store,
            group_source,
        }
    }

    /// Returns the union of the permissions granted by every role reachable
    /// from the user, directly or through one of the user's groups.
    ///
    /// A failed group lookup fails the whole resolution. A role name that no
    /// longer resolves to a role is reported as `AppError::Inconsistent`.
    pub async fn resolve(&self, user_id: &str) -> AppResult<IdentifierSet> {
        let group_ids = self.group_source.groups_for_user(user_id).await?;
        debug!(user = user_id, groups = group_ids.len(), "resolved group memberships");

        let mut role_names = IdentifierSet::new();
        for group in self.store.read_groups(&group_ids).await? {
            role_names.add(group.roles());
        }
        if let Some(user) = self.store.find_user(user_id).await? {
            role_names.add(user.roles());
        }

        if role_names.is_empty() {
            return Ok(IdentifierSet::new());
        }

        let roles = self
            .store
            .bulk_read_roles(&role_names.to_vec())
            .await
            .map_err(|error| match error {
                AppError::NotFound(role) => {
                    warn!(user = user_id, role = %role, "user reaches a role that does not exist");
                    AppError::Inconsistent(format!(
                        "user '{user_id}' references missing role: {role}"
                    ))
                }
                other => other,
            })?;

        let mut permissions = IdentifierSet::new();
        for role in &roles {
            permissions.add(role.permissions());
        }

        Ok(permissions)
    }

    /// Returns the stored user record, if any.
    pub async fn find_user(&self, user_id: &str) -> AppResult<Option<User>> {
        self.store.find_user(user_id).await
    }

    /// Returns the stored group record, if any.
    pub async fn find_group(&self, group_id: &str) -> AppResult<Option<Group>> {
        self.store.find_group(group_id).await
    }
}
