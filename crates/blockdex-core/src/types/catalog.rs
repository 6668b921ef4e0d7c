use serde::{Deserialize, Serialize};

use super::record::Record;

/// Records filed under one category label, in scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub label: String,
    pub records: Vec<Record>,
}

/// Ordered, category-grouped collection of records.
///
/// Categories keep the order in which they were first seen, and records keep
/// insertion order within their category. Backed by vectors so iteration
/// order is always the scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<CategoryGroup>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the group named by `record.category`, creating the
    /// group at the end if it does not exist yet.
    ///
    /// Name uniqueness is the builder's concern; this does not check it.
    pub fn insert(&mut self, record: Record) {
        match self
            .categories
            .iter_mut()
            .find(|group| group.label == record.category)
        {
            Some(group) => group.records.push(record),
            None => self.categories.push(CategoryGroup {
                label: record.category.clone(),
                records: vec![record],
            }),
        }
    }

    /// Records of one category, if it exists.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[Record]> {
        self.categories
            .iter()
            .find(|group| group.label == label)
            .map(|group| group.records.as_slice())
    }

    /// Looks up a record by name across all categories.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records().find(|record| record.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Removes the record with the given name. A category left empty is
    /// dropped so it does not linger in the output.
    pub fn remove(&mut self, name: &str) -> Option<Record> {
        let (group_idx, record_idx) =
            self.categories
                .iter()
                .enumerate()
                .find_map(|(group_idx, group)| {
                    group
                        .records
                        .iter()
                        .position(|record| record.name == name)
                        .map(|record_idx| (group_idx, record_idx))
                })?;

        let removed = self.categories[group_idx].records.remove(record_idx);
        if self.categories[group_idx].records.is_empty() {
            self.categories.remove(group_idx);
        }
        Some(removed)
    }

    /// Category groups in first-seen order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryGroup] {
        &self.categories
    }

    /// All records, category by category.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.categories.iter().flat_map(|group| group.records.iter())
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.iter().map(|group| group.records.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Successful outcome of one catalog build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// The extracted catalog.
    pub catalog: Catalog,

    /// Record candidates dropped because their delimiter never closed.
    pub skipped: usize,

    /// Records dropped because their name is in the exclusion set.
    pub excluded: usize,
}

impl BuildReport {
    /// Returns `true` if some candidates could not be extracted.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.skipped > 0
    }
}
