use std::sync::Arc;

use warrant_core::IdentifierSet;
use warrant_domain::{Permission, Role, RoleMembers};

use crate::AccessStore;
use crate::test_support::{FakeAccessStore, names};

use super::MembershipSynchronizer;

async fn seeded_store(permissions: &[&str]) -> Arc<FakeAccessStore> {
    let store = Arc::new(FakeAccessStore::default());
    for name in permissions {
        let permission = Permission::new(*name, "", "alice", IdentifierSet::new())
            .unwrap_or_else(|_| unreachable!());
        assert!(store.create_permission(permission).await.is_ok());
    }
    store
}

fn members(permissions: &[&str], users: &[&str], groups: &[&str]) -> RoleMembers {
    RoleMembers {
        permissions: names(permissions),
        users: names(users),
        groups: names(groups),
    }
}

#[tokio::test]
async fn link_role_materializes_users_and_groups() {
    let store = seeded_store(&["p1"]).await;
    let synchronizer = MembershipSynchronizer::new(store.clone());

    let linked = synchronizer
        .link_role("r1", &members(&["p1"], &["u1"], &["g1"]))
        .await;
    assert!(linked.is_ok());

    let permission = store.find_permission("p1").await.unwrap_or_default();
    assert!(permission.is_some_and(|permission| permission.roles().contains("r1")));
    let user = store.find_user("u1").await.unwrap_or_default();
    assert!(user.is_some_and(|user| user.roles().contains("r1")));
    let group = store.find_group("g1").await.unwrap_or_default();
    assert!(group.is_some_and(|group| group.roles().contains("r1")));
}

#[tokio::test]
async fn unlink_role_ignores_absent_members_and_keeps_records() {
    let store = seeded_store(&["p1"]).await;
    let synchronizer = MembershipSynchronizer::new(store.clone());
    assert!(
        synchronizer
            .link_role("r1", &members(&["p1"], &["u1"], &[]))
            .await
            .is_ok()
    );

    let unlinked = synchronizer
        .unlink_role("r1", &members(&["p1"], &["u1", "ghost"], &["g-unknown"]))
        .await;
    assert!(unlinked.is_ok());

    let user = store.find_user("u1").await.unwrap_or_default();
    assert!(user.is_some_and(|user| user.roles().is_empty()));
    assert!(store.find_user("ghost").await.unwrap_or_default().is_none());
    assert!(
        store
            .find_group("g-unknown")
            .await
            .unwrap_or_default()
            .is_none()
    );
}

#[tokio::test]
async fn reconcile_adds_missing_and_strips_stale_links() {
    let store = seeded_store(&["p1", "p2"]).await;
    let synchronizer = MembershipSynchronizer::new(store.clone());
    let role = Role::new(
        "r1",
        "",
        "alice",
        IdentifierSet::new(),
        members(&["p1"], &["u1"], &["g1"]),
    )
    .unwrap_or_else(|_| unreachable!());
    assert!(store.create_role(role.clone()).await.is_ok());

    // Simulate a half-applied synchronization: p1 was never linked, p2 and u2
    // still point at the role.
    assert!(
        synchronizer
            .link_role("r1", &members(&["p2"], &["u1", "u2"], &[]))
            .await
            .is_ok()
    );

    let report = synchronizer
        .reconcile("r1", Some(&role))
        .await
        .unwrap_or_default();
    assert_eq!(report.linked, members(&["p1"], &[], &["g1"]));
    assert_eq!(report.unlinked, members(&["p2"], &["u2"], &[]));

    let second = synchronizer
        .reconcile("r1", Some(&role))
        .await
        .unwrap_or_default();
    assert!(second.is_clean());
}

#[tokio::test]
async fn reconcile_of_missing_role_strips_every_reference() {
    let store = seeded_store(&["p1"]).await;
    let synchronizer = MembershipSynchronizer::new(store.clone());
    assert!(
        synchronizer
            .link_role("ghost", &members(&["p1"], &["u1"], &["g1"]))
            .await
            .is_ok()
    );

    let report = synchronizer
        .reconcile("ghost", None)
        .await
        .unwrap_or_default();
    assert_eq!(report.unlinked, members(&["p1"], &["u1"], &["g1"]));

    let group = store.find_group("g1").await.unwrap_or_default();
    assert!(group.is_some_and(|group| group.roles().is_empty()));
}

#[tokio::test]
async fn reconcile_skips_permissions_that_no_longer_exist() {
    let store = seeded_store(&[]).await;
    let synchronizer = MembershipSynchronizer::new(store.clone());
    let role = Role::new(
        "r1",
        "",
        "alice",
        IdentifierSet::new(),
        members(&["deleted"], &[], &[]),
    )
    .unwrap_or_else(|_| unreachable!());

    let report = synchronizer.reconcile("r1", Some(&role)).await;
    assert!(report.is_ok_and(|report| report.is_clean()));
}
