use std::collections::BTreeSet;
use std::collections::btree_set;

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Set of unique string identifiers.
///
/// Used for owner lists, role member lists and back-references. Members are kept
/// sorted so [`IdentifierSet::to_vec`] yields the same sequence for the same
/// contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierSet(BTreeSet<String>);

impl IdentifierSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns whether the identifier is a member.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.0.contains(identifier)
    }

    /// Inserts every identifier and returns the mutated set.
    pub fn add<I, S>(&mut self, identifiers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Removes every identifier that is present and returns the mutated set.
    pub fn remove<I, S>(&mut self, identifiers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for identifier in identifiers {
            self.0.remove(identifier.as_ref());
        }
        self
    }

    /// Returns a new set holding members of either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    /// Returns a new set holding members of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    /// Returns the members as an ordered sequence without duplicates.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    /// Iterates members in order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Returns the member count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rejects blank or whitespace-padded identifiers.
    pub fn ensure_non_blank(&self, field: &str) -> AppResult<()> {
        match self
            .0
            .iter()
            .find(|identifier| identifier.trim().is_empty() || identifier.trim() != *identifier)
        {
            Some(identifier) => Err(AppError::Validation(format!(
                "{field} identifier '{identifier}' must not be blank or padded"
            ))),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for IdentifierSet {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdentifierSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<String>> for IdentifierSet {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}
