use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Instructor and administration blocks that never belong in a learner-facing
/// catalog.
pub const ENTRY_ADMIN_BLOCKS: &[&str] = &[
    "check_block_execution",
    "check_goal_success",
    "register_score",
    "check_variable_by_name",
    "show_prompt",
    "check_lecture_goal",
    "is_answer_submited",
];

/// Fixed set of record names to drop from every build.
///
/// Membership is exact and case-sensitive; names are not normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeSet<String>);

impl ExclusionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock preset of instructor/administration block names.
    #[must_use]
    pub fn entry_admin_blocks() -> Self {
        ENTRY_ADMIN_BLOCKS.iter().copied().collect()
    }

    /// Adds a name; returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}
