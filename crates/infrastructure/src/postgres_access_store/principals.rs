use super::*;

impl PostgresAccessStore {
    pub(super) async fn find_user_impl(&self, id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, roles, permissions
            FROM access_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user '{id}': {error}")))?;

        Ok(row.map(User::from))
    }

    pub(super) async fn list_users_impl(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, roles, permissions
            FROM access_users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub(super) async fn materialize_user_impl(&self, id: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO access_users (id)
            VALUES ($1)
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
            RETURNING id, roles, permissions
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to materialize user '{id}': {error}"))
        })?;

        Ok(User::from(row))
    }

    pub(super) async fn update_user_impl(&self, user: User) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE access_users
            SET roles = $2, permissions = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id())
        .bind(user.roles().to_vec())
        .bind(user.permissions().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update user '{}': {error}", user.id()))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                user.id()
            )));
        }

        Ok(())
    }

    pub(super) async fn add_role_to_users_impl(&self, role: &str, ids: &[String]) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_users (id, roles)
            SELECT DISTINCT member_id, ARRAY[$1::TEXT]
            FROM unnest($2::TEXT[]) AS member_id
            ON CONFLICT (id) DO UPDATE
            SET roles = CASE
                WHEN $1 = ANY(access_users.roles) THEN access_users.roles
                ELSE array_append(access_users.roles, $1)
            END
            "#,
        )
        .bind(role)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to link role '{role}' to users: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn remove_role_from_users_impl(
        &self,
        role: &str,
        ids: &[String],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE access_users
            SET roles = array_remove(roles, $1)
            WHERE id = ANY($2)
            "#,
        )
        .bind(role)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to unlink role '{role}' from users: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn find_group_impl(&self, id: &str) -> AppResult<Option<Group>> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, roles
            FROM access_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find group '{id}': {error}")))?;

        Ok(row.map(Group::from))
    }

    pub(super) async fn read_groups_impl(&self, ids: &[String]) -> AppResult<Vec<Group>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, roles
            FROM access_groups
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read groups: {error}")))?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    pub(super) async fn list_groups_impl(&self) -> AppResult<Vec<Group>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, roles
            FROM access_groups
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list groups: {error}")))?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    pub(super) async fn materialize_group_impl(&self, id: &str) -> AppResult<Group> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO access_groups (id)
            VALUES ($1)
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
            RETURNING id, roles
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to materialize group '{id}': {error}"))
        })?;

        Ok(Group::from(row))
    }

    pub(super) async fn update_group_impl(&self, group: Group) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE access_groups
            SET roles = $2
            WHERE id = $1
            "#,
        )
        .bind(group.id())
        .bind(group.roles().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update group '{}': {error}", group.id()))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "group '{}' does not exist",
                group.id()
            )));
        }

        Ok(())
    }

    pub(super) async fn add_role_to_groups_impl(
        &self,
        role: &str,
        ids: &[String],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_groups (id, roles)
            SELECT DISTINCT member_id, ARRAY[$1::TEXT]
            FROM unnest($2::TEXT[]) AS member_id
            ON CONFLICT (id) DO UPDATE
            SET roles = CASE
                WHEN $1 = ANY(access_groups.roles) THEN access_groups.roles
                ELSE array_append(access_groups.roles, $1)
            END
            "#,
        )
        .bind(role)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to link role '{role}' to groups: {error}"))
        })?;

        Ok(())
    }

    pub(super) async fn remove_role_from_groups_impl(
        &self,
        role: &str,
        ids: &[String],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE access_groups
            SET roles = array_remove(roles, $1)
            WHERE id = ANY($2)
            "#,
        )
        .bind(role)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to unlink role '{role}' from groups: {error}"
            ))
        })?;

        Ok(())
    }
}
