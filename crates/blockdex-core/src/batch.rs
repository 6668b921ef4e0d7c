//! # Multi-document Builds
//!
//! Runs one independent build per document and folds the results into a
//! single catalog. Builds share nothing but the read-only builder, so with
//! the `rayon` feature they run in parallel; results always come back in
//! input order.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::builder::{BuildStrategy, CatalogBuilder, DuplicatePolicy};
use crate::error::{CatalogError, Result};
use crate::extract::CategoryRules;
use crate::types::BuildReport;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// One named source text, e.g. the contents of `block_moving.js`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name or URL tail the text came from.
    pub name: String,
    pub text: String,
}

impl Document {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Category label derived from the document name, with any directory or
    /// URL path stripped first.
    #[must_use]
    pub fn category(&self, rules: &CategoryRules) -> Option<String> {
        let base = self
            .name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str());
        rules.normalize(base)
    }
}

/// Build outcome for one document.
#[derive(Debug)]
pub struct DocumentReport {
    pub name: String,
    pub result: Result<BuildReport>,
}

/// Builds every document independently.
///
/// For deep-span builds with an empty category, each document's records are
/// filed under the label derived from its name (`block_looks.js` → `looks`).
pub fn build_documents(builder: &CatalogBuilder, documents: &[Document]) -> Vec<DocumentReport> {
    let rules = CategoryRules::default();
    let build_one = |doc: &Document| {
        let fallback = match builder.config().strategy {
            BuildStrategy::DeepSpan { .. } => doc.category(&rules),
            BuildStrategy::LineScan { .. } => None,
        };
        DocumentReport {
            name: doc.name.clone(),
            result: builder.build_in(&doc.text, fallback.as_deref()),
        }
    };

    #[cfg(feature = "rayon")]
    let reports: Vec<DocumentReport> = documents.par_iter().map(build_one).collect();
    #[cfg(not(feature = "rayon"))]
    let reports: Vec<DocumentReport> = documents.iter().map(build_one).collect();

    reports
}

/// Folds per-document reports into one, in input order.
///
/// Failed documents are logged and left out. Names that repeat across
/// documents follow `policy`.
///
/// # Errors
///
/// Returns `CatalogError::DuplicateRecord` for a repeated name under
/// `DuplicatePolicy::Reject`.
pub fn merge(reports: Vec<DocumentReport>, policy: DuplicatePolicy) -> Result<BuildReport> {
    let mut merged = BuildReport::default();
    let mut names = HashSet::new();
    let mut failed = 0usize;

    for DocumentReport { name, result } in reports {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(document = %name, error = %e, "document skipped");
                failed += 1;
                continue;
            }
        };

        merged.skipped += report.skipped;
        merged.excluded += report.excluded;

        for group in report.catalog.categories() {
            for record in &group.records {
                if !names.insert(record.name.clone()) {
                    match policy {
                        DuplicatePolicy::Reject => {
                            return Err(CatalogError::DuplicateRecord {
                                name: record.name.clone(),
                                category: record.category.clone(),
                            });
                        }
                        DuplicatePolicy::LastWins => {
                            warn!(document = %name, record = %record.name, "replacing duplicate record");
                            merged.catalog.remove(&record.name);
                        }
                    }
                }
                merged.catalog.insert(record.clone());
            }
        }
    }

    debug!(
        records = merged.catalog.len(),
        categories = merged.catalog.categories().len(),
        failed,
        "documents merged"
    );
    Ok(merged)
}
