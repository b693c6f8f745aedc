use warrant_domain::Owned;

use super::*;

impl PostgresAccessStore {
    pub(super) async fn create_role_impl(&self, role: Role) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_roles (name, description, owners, permissions, users, groups)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(role.name())
        .bind(role.description())
        .bind(role.owners().to_vec())
        .bind(role.permissions().to_vec())
        .bind(role.users().to_vec())
        .bind(role.groups().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|error| map_unique_violation(error, "role", role.name()))?;

        Ok(())
    }

    pub(super) async fn find_role_impl(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, description, owners, permissions, users, groups
            FROM access_roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{name}': {error}")))?;

        Ok(row.map(Role::from))
    }

    pub(super) async fn bulk_read_roles_impl(&self, names: &[String]) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, description, owners, permissions, users, groups
            FROM access_roles
            WHERE name = ANY($1)
            "#,
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read roles: {error}")))?;

        let ordered = in_request_order(rows, names, |row| row.name.as_str(), "role")?;
        Ok(ordered.into_iter().map(Role::from).collect())
    }

    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT name, description, owners, permissions, users, groups
            FROM access_roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    pub(super) async fn update_role_impl(&self, role: Role) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE access_roles
            SET description = $2, owners = $3, permissions = $4, users = $5, groups = $6
            WHERE name = $1
            "#,
        )
        .bind(role.name())
        .bind(role.description())
        .bind(role.owners().to_vec())
        .bind(role.permissions().to_vec())
        .bind(role.users().to_vec())
        .bind(role.groups().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update role '{}': {error}", role.name()))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.name()
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_role_impl(&self, name: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM access_roles WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete role '{name}': {error}"))
            })?;

        Ok(())
    }
}
