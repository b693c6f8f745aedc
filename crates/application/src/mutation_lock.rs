use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Process-wide write lock shared by every mutating service.
///
/// A mutation holds the guard from its first read through the last back-link
/// update, so two mutation sequences never interleave. The lock only spans one
/// process, so a deployment runs a single instance serving mutating routes.
#[derive(Debug, Clone, Default)]
pub struct MutationLock {
    inner: Arc<Mutex<()>>,
}

impl MutationLock {
    /// Creates an unlocked lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}
