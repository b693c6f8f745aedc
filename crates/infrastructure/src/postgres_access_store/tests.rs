use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use warrant_application::AccessStore;
use warrant_core::{AppError, IdentifierSet};
use warrant_domain::{Group, Permission, Role, RoleMembers, User};

use super::{PostgresAccessStore, in_request_order};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres access store tests: {error}");
    }

    Some(pool)
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("{prefix}-{nanos}")
}

fn permission(name: &str) -> Permission {
    Permission::new(name, "test permission", "alice", IdentifierSet::new())
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn permission_round_trip_and_duplicate_rejection() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresAccessStore::new(pool);
    let name = unique("perm");

    assert!(store.create_permission(permission(&name)).await.is_ok());
    let duplicate = store.create_permission(permission(&name)).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let found = store.find_permission(&name).await.unwrap_or_default();
    assert!(found.is_some_and(|permission| permission.description() == "test permission"));

    assert!(store.delete_permission(&name).await.is_ok());
    assert!(store.delete_permission(&name).await.is_ok());
    assert!(store.find_permission(&name).await.unwrap_or_default().is_none());
}

#[tokio::test]
async fn bulk_read_reports_missing_names() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresAccessStore::new(pool);
    let first = unique("perm-a");
    let second = unique("perm-b");
    assert!(store.create_permission(permission(&first)).await.is_ok());
    assert!(store.create_permission(permission(&second)).await.is_ok());

    let read = store
        .bulk_read_permissions(&[second.clone(), first.clone()])
        .await
        .unwrap_or_default();
    assert_eq!(read.len(), 2);
    assert_eq!(read[0].name(), second);

    let missing = unique("perm-missing");
    let result = store
        .bulk_read_permissions(&[first.clone(), missing.clone()])
        .await;
    assert!(matches!(result, Err(AppError::NotFound(message)) if message.contains(&missing)));
}

#[tokio::test]
async fn permission_back_links_are_all_or_nothing() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresAccessStore::new(pool);
    let name = unique("perm");
    let role = unique("role");
    assert!(store.create_permission(permission(&name)).await.is_ok());

    let partial = store
        .add_role_to_permissions(&role, &[name.clone(), unique("absent")])
        .await;
    assert!(matches!(partial, Err(AppError::NotFound(_))));
    let untouched = store.find_permission(&name).await.unwrap_or_default();
    assert!(untouched.is_some_and(|permission| permission.roles().is_empty()));

    assert!(store.add_role_to_permissions(&role, &[name.clone()]).await.is_ok());
    assert!(store.add_role_to_permissions(&role, &[name.clone()]).await.is_ok());
    let linked = store.find_permission(&name).await.unwrap_or_default();
    assert!(linked.is_some_and(|permission| permission.roles().len() == 1));

    assert!(
        store
            .remove_role_from_permissions(&role, &[name.clone()])
            .await
            .is_ok()
    );
    let unlinked = store.find_permission(&name).await.unwrap_or_default();
    assert!(unlinked.is_some_and(|permission| permission.roles().is_empty()));
}

#[tokio::test]
async fn role_update_persists_members_and_rejects_unknown_roles() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresAccessStore::new(pool);
    let name = unique("role");
    let role = Role::new(
        name.as_str(),
        "",
        "alice",
        IdentifierSet::new(),
        RoleMembers::default(),
    )
    .unwrap_or_else(|_| unreachable!());

    let missing = store.update_role(role.clone()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert!(store.create_role(role.clone()).await.is_ok());
    let mut updated = role;
    updated.add_members(&RoleMembers {
        users: ["u1", "u2"].into_iter().collect(),
        ..RoleMembers::default()
    });
    assert!(store.update_role(updated).await.is_ok());

    let found = store.find_role(&name).await.unwrap_or_default();
    assert!(found.is_some_and(|role| role.users().len() == 2));
    assert!(store.delete_role(&name).await.is_ok());
}

#[tokio::test]
async fn user_and_group_links_materialize_records() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresAccessStore::new(pool);
    let role = unique("role");
    let user = unique("user");
    let group = unique("group");

    assert!(
        store
            .add_role_to_users(&role, &[user.clone(), user.clone()])
            .await
            .is_ok()
    );
    assert!(store.add_role_to_users(&role, &[user.clone()]).await.is_ok());
    assert!(store.add_role_to_groups(&role, &[group.clone()]).await.is_ok());

    let found = store.find_user(&user).await.unwrap_or_default();
    assert!(found.is_some_and(|user| user.roles().to_vec() == vec![role.clone()]));

    let groups = store
        .read_groups(&[group.clone(), unique("absent")])
        .await
        .unwrap_or_default();
    assert_eq!(groups.len(), 1);

    assert!(store.remove_role_from_users(&role, &[user.clone()]).await.is_ok());
    let cleared = store.find_user(&user).await.unwrap_or_default();
    assert!(cleared.is_some_and(|user| user.roles().is_empty()));

    let materialized = store.materialize_group(&group).await;
    assert!(materialized.is_ok_and(|group| group.roles().contains(&role)));
}

#[tokio::test]
async fn principal_updates_require_existing_records() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = PostgresAccessStore::new(pool);
    let user_id = unique("user");
    let group_id = unique("group");

    let user = store.update_user(User::new(user_id.clone())).await;
    assert!(matches!(user, Err(AppError::NotFound(_))));
    let group = store.update_group(Group::new(group_id.clone())).await;
    assert!(matches!(group, Err(AppError::NotFound(_))));
    assert!(store.find_user(&user_id).await.unwrap_or_default().is_none());
    assert!(store.find_group(&group_id).await.unwrap_or_default().is_none());

    let mut user = store
        .materialize_user(&user_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    user.link_role("r1");
    assert!(store.update_user(user).await.is_ok());
    let mut group = store
        .materialize_group(&group_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    group.link_role("r2");
    assert!(store.update_group(group).await.is_ok());

    let user = store.find_user(&user_id).await.unwrap_or_default();
    assert!(user.is_some_and(|user| user.roles().contains("r1")));
    let group = store.find_group(&group_id).await.unwrap_or_default();
    assert!(group.is_some_and(|group| group.roles().contains("r2")));
}

#[test]
fn request_order_repeats_duplicate_keys_and_reports_missing_ones() {
    let rows = vec!["b".to_owned(), "a".to_owned()];
    let keys = ["a".to_owned(), "b".to_owned(), "a".to_owned()];

    let ordered = in_request_order(rows.clone(), &keys, String::as_str, "permission")
        .unwrap_or_default();
    assert_eq!(ordered, vec!["a".to_owned(), "b".to_owned(), "a".to_owned()]);

    let missing = in_request_order(rows, &["a".to_owned(), "c".to_owned()], String::as_str, "permission");
    assert!(matches!(missing, Err(AppError::NotFound(message)) if message.contains("'c'")));
}
