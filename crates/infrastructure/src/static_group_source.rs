use std::collections::HashMap;

use async_trait::async_trait;
use warrant_application::GroupSource;
use warrant_core::{AppError, AppResult};

/// Group source backed by a fixed user-to-groups table.
#[derive(Debug, Clone, Default)]
pub struct StaticGroupSource {
    memberships: HashMap<String, Vec<String>>,
}

impl StaticGroupSource {
    /// Creates a source from an explicit membership table.
    #[must_use]
    pub fn new(memberships: HashMap<String, Vec<String>>) -> Self {
        Self { memberships }
    }

    /// Parses a JSON object of the form `{ "user": ["group", ...] }`.
    pub fn from_json(document: &str) -> AppResult<Self> {
        let memberships = serde_json::from_str::<HashMap<String, Vec<String>>>(document)
            .map_err(|error| {
                AppError::Validation(format!("invalid static group table: {error}"))
            })?;

        Ok(Self::new(memberships))
    }
}

#[async_trait]
impl GroupSource for StaticGroupSource {
    async fn groups_for_user(&self, user_id: &str) -> AppResult<Vec<String>> {
        Ok(self.memberships.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use warrant_application::GroupSource;
    use warrant_core::AppError;

    use super::StaticGroupSource;

    #[tokio::test]
    async fn returns_configured_groups_and_empty_for_unknown_users() {
        let source = StaticGroupSource::from_json(r#"{ "u1": ["g1", "g2"] }"#)
            .unwrap_or_else(|_| unreachable!());

        let known = source.groups_for_user("u1").await.unwrap_or_default();
        assert_eq!(known, vec!["g1".to_owned(), "g2".to_owned()]);

        let unknown = source.groups_for_user("nobody").await;
        assert!(unknown.is_ok_and(|groups| groups.is_empty()));
    }

    #[test]
    fn rejects_malformed_tables() {
        let result = StaticGroupSource::from_json(r#"{ "u1": "g1" }"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
