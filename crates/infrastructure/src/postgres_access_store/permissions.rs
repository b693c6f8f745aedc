use warrant_domain::Owned;

use super::*;

impl PostgresAccessStore {
    pub(super) async fn create_permission_impl(&self, permission: Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_permissions (name, description, owners, roles)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(permission.name())
        .bind(permission.description())
        .bind(permission.owners().to_vec())
        .bind(permission.roles().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|error| map_unique_violation(error, "permission", permission.name()))?;

        Ok(())
    }

    pub(super) async fn find_permission_impl(&self, name: &str) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT name, description, owners, roles
            FROM access_permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission '{name}': {error}"))
        })?;

        Ok(row.map(Permission::from))
    }

    pub(super) async fn bulk_read_permissions_impl(
        &self,
        names: &[String],
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT name, description, owners, roles
            FROM access_permissions
            WHERE name = ANY($1)
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read permissions: {error}")))?;

        let ordered = in_request_order(rows, names, |row| row.name.as_str(), "permission")?;
        Ok(ordered.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT name, description, owners, roles
            FROM access_permissions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    pub(super) async fn update_permission_impl(&self, permission: Permission) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE access_permissions
            SET description = $2, owners = $3, roles = $4
            WHERE name = $1
            "#,
        )
        .bind(permission.name())
        .bind(permission.description())
        .bind(permission.owners().to_vec())
        .bind(permission.roles().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update permission '{}': {error}",
                permission.name()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' does not exist",
                permission.name()
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_permission_impl(&self, name: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM access_permissions WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete permission '{name}': {error}"))
            })?;

        Ok(())
    }

    pub(super) async fn add_role_to_permissions_impl(
        &self,
        role: &str,
        names: &[String],
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let existing = sqlx::query_scalar::<_, String>(
            r#"
            SELECT name
            FROM access_permissions
            WHERE name = ANY($1)
            FOR UPDATE
            "#,
        )
        .bind(names)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock permissions: {error}")))?;

        if let Some(missing) = names.iter().find(|name| !existing.contains(name)) {
            return Err(AppError::NotFound(format!(
                "permission '{missing}' does not exist"
            )));
        }

        sqlx::query(
            r#"
            UPDATE access_permissions
            SET roles = array_append(roles, $1)
            WHERE name = ANY($2) AND NOT ($1 = ANY(roles))
            "#,
        )
        .bind(role)
        .bind(names)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to link role '{role}' to permissions: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn remove_role_from_permissions_impl(
        &self,
        role: &str,
        names: &[String],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE access_permissions
            SET roles = array_remove(roles, $1)
            WHERE name = ANY($2)
            "#,
        )
        .bind(role)
        .bind(names)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to unlink role '{role}' from permissions: {error}"
            ))
        })?;

        Ok(())
    }
}
