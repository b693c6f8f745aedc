use async_trait::async_trait;

use warrant_core::AppResult;

/// Port resolving a user's group memberships.
///
/// Implementations return an empty list when the user is unknown or has no
/// groups, and `AppError::LookupFailed` only when the backend itself fails.
#[async_trait]
pub trait GroupSource: Send + Sync {
    /// Lists group identifiers the user belongs to.
    async fn groups_for_user(&self, user_id: &str) -> AppResult<Vec<String>>;
}
