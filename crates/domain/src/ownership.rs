//! Ownership rules gating every mutation of permissions and roles.
//!
//! The checks here are pure: they inspect already-loaded entities and never
//! touch storage.

use std::fmt::{Display, Formatter};

use warrant_core::{Actor, AppError, AppResult, IdentifierSet};

/// Entity kinds that carry an owner set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A grantable permission.
    Permission,
    /// A role bundling permissions.
    Role,
}

impl EntityKind {
    /// Returns a stable lowercase label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permission => "permission",
            Self::Role => "role",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Entity guarded by an owner set.
pub trait Owned {
    /// Returns the entity kind.
    fn kind(&self) -> EntityKind;

    /// Returns the unique entity key.
    fn key(&self) -> &str;

    /// Returns the identities allowed to mutate the entity.
    fn owners(&self) -> &IdentifierSet;
}

/// Returns whether the actor owns the entity.
#[must_use]
pub fn is_authorized(actor: &Actor, entity: &impl Owned) -> bool {
    entity.owners().contains(actor.subject())
}

/// Fails with `Unauthorized` unless the actor owns the entity.
pub fn ensure_owner(actor: &Actor, entity: &impl Owned) -> AppResult<()> {
    if is_authorized(actor, entity) {
        return Ok(());
    }

    Err(AppError::Unauthorized(format!(
        "'{}' is not an owner of {} '{}'",
        actor.subject(),
        entity.kind(),
        entity.key()
    )))
}

/// Fails with `Unauthorized` on the first entity the actor does not own.
pub fn ensure_owner_of_all<'a, T>(
    actor: &Actor,
    entities: impl IntoIterator<Item = &'a T>,
) -> AppResult<()>
where
    T: Owned + 'a,
{
    entities
        .into_iter()
        .try_for_each(|entity| ensure_owner(actor, entity))
}

/// Fails with `Conflict` when a removal list contains the actor.
pub fn ensure_not_self_removal(
    actor: &Actor,
    entity: &impl Owned,
    removed_owners: &IdentifierSet,
) -> AppResult<()> {
    if !removed_owners.contains(actor.subject()) {
        return Ok(());
    }

    Err(AppError::Conflict(format!(
        "'{}' cannot remove themselves from the owners of {} '{}'",
        actor.subject(),
        entity.kind(),
        entity.key()
    )))
}

#[cfg(test)]
mod tests {
    use warrant_core::{Actor, AppError, IdentifierSet};

    use super::{ensure_not_self_removal, ensure_owner, ensure_owner_of_all, is_authorized};
    use crate::Permission;

    fn actor(subject: &str) -> Actor {
        Actor::new(subject).unwrap_or_else(|_| unreachable!())
    }

    fn permission(name: &str, creator: &str) -> Permission {
        Permission::new(name, "", creator, IdentifierSet::new()).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn owner_is_authorized() {
        let permission = permission("billing.read", "alice");
        assert!(is_authorized(&actor("alice"), &permission));
        assert!(!is_authorized(&actor("mallory"), &permission));
    }

    #[test]
    fn unauthorized_error_names_checked_entity() {
        let permission = permission("billing.read", "alice");
        let result = ensure_owner(&actor("mallory"), &permission);

        let Err(AppError::Unauthorized(message)) = result else {
            panic!("expected unauthorized");
        };
        assert!(message.contains("permission 'billing.read'"));
    }

    #[test]
    fn ownership_of_all_fails_on_any_foreign_entity() {
        let owned = permission("billing.read", "alice");
        let foreign = permission("billing.write", "bob");

        assert!(ensure_owner_of_all(&actor("alice"), [&owned]).is_ok());
        assert!(matches!(
            ensure_owner_of_all(&actor("alice"), [&owned, &foreign]),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn self_removal_is_a_conflict() {
        let mut owners = IdentifierSet::new();
        owners.add(["alice", "bob"]);
        let permission =
            Permission::new("billing.read", "", "alice", owners).unwrap_or_else(|_| unreachable!());

        let removing_self: IdentifierSet = ["alice"].into_iter().collect();
        let removing_other: IdentifierSet = ["bob"].into_iter().collect();

        assert!(matches!(
            ensure_not_self_removal(&actor("alice"), &permission, &removing_self),
            Err(AppError::Conflict(_))
        ));
        assert!(ensure_not_self_removal(&actor("alice"), &permission, &removing_other).is_ok());
    }
}
