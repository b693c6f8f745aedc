use serde::{Deserialize, Serialize};

use crate::{AppResult, NonEmptyString};

/// Authenticated identity performing a mutating request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    subject: String,
}

impl Actor {
    /// Creates an actor from a validated subject identifier.
    pub fn new(subject: impl Into<String>) -> AppResult<Self> {
        let subject = NonEmptyString::new(subject)?;
        Ok(Self {
            subject: subject.into(),
        })
    }

    /// Returns the stable subject identifier of the actor.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}
