//! # Catalog Builder
//!
//! Turns source text into a [`Catalog`](crate::Catalog) using one of two strategies:
//! a shallow line scan with comment-driven categories, or a deep scan of
//! one delimited region whose top-level entries become records.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::extract::{
    AnchorPath, CategoryRules, CategoryTracker, DEFAULT_CATEGORY, DelimiterSpanExtractor,
    ExclusionSet, FieldExtractor, RecordSplitter,
};
use crate::types::{BuildReport, Fields, Record, Span};

/// Where the deep-span strategy looks for records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// The whole input is split directly; no outer delimiter pair is needed.
    Whole,
    /// The balanced span opening at or after the located anchor path.
    Anchored(AnchorPath),
}

/// Extraction strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildStrategy {
    /// One record per `name: "value"` line, filed under the category of the
    /// most recent comment marker.
    LineScan {
        #[serde(default)]
        rules: CategoryRules,
    },
    /// One record per top-level `name: { ... }` entry of a region, all filed
    /// under one fixed category.
    DeepSpan {
        region: Region,
        /// Empty means [`DEFAULT_CATEGORY`], or the document-derived label in
        /// batch builds.
        #[serde(default)]
        category: String,
    },
}

impl Default for BuildStrategy {
    fn default() -> Self {
        Self::line_scan()
    }
}

impl BuildStrategy {
    /// Line scan with the default marker rules.
    #[must_use]
    pub fn line_scan() -> Self {
        Self::LineScan {
            rules: CategoryRules::default(),
        }
    }

    /// Deep scan of the object literal returned by `getBlocks()`.
    #[must_use]
    pub fn entry_blocks(category: impl Into<String>) -> Self {
        Self::DeepSpan {
            region: Region::Anchored(AnchorPath::entry_get_blocks()),
            category: category.into(),
        }
    }
}

/// What to do when a record name repeats within one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the build with `CatalogError::DuplicateRecord`.
    #[default]
    Reject,
    /// Drop the earlier record and keep the later one at its own position.
    LastWins,
}

/// Configuration for the catalog builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Which extraction strategy to run.
    pub strategy: BuildStrategy,
    /// Record names that never appear in the output.
    pub exclusions: ExclusionSet,
    /// Handling of repeated record names.
    pub duplicates: DuplicatePolicy,
}

impl BuilderConfig {
    /// Create a new builder configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidConfig` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CatalogError::InvalidConfig(e.to_string()))
    }

    /// Set the extraction strategy.
    pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the exclusion set.
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Set the duplicate-name policy.
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    fn validate(&self) -> Result<()> {
        match &self.strategy {
            BuildStrategy::LineScan { rules } if rules.default_label.trim().is_empty() => Err(
                CatalogError::InvalidConfig("default category label is empty".into()),
            ),
            BuildStrategy::DeepSpan {
                region: Region::Anchored(path),
                ..
            } if path.is_empty() || path.tokens().iter().any(String::is_empty) => Err(
                CatalogError::InvalidConfig("anchor path contains no usable token".into()),
            ),
            _ => Ok(()),
        }
    }
}

/// Builds catalogs from source text.
///
/// Holds only compiled patterns and configuration, so one builder can serve
/// any number of independent builds.
pub struct CatalogBuilder {
    config: BuilderConfig,
    spans: DelimiterSpanExtractor,
    splitter: RecordSplitter,
    fields: FieldExtractor,
    re_line: Regex,
}

impl CatalogBuilder {
    /// Create a new builder with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidConfig` for an unusable configuration and
    /// `CatalogError::RegexError` if a pattern fails to compile.
    pub fn new(config: BuilderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            spans: DelimiterSpanExtractor::braces(),
            splitter: RecordSplitter::new()?,
            fields: FieldExtractor::new()?,
            re_line: Regex::new(r#"^(\w+):\s*"(.*?)""#)?,
        })
    }

    /// Get the builder configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Builds a catalog from `input` with the configured strategy.
    ///
    /// # Examples
    /// ```
    /// use blockdex_core::{BuildStrategy, BuilderConfig, CatalogBuilder};
    ///
    /// let source = "getBlocks() { return { move_x: { skeleton: 'basic' } }; }";
    /// let config = BuilderConfig::new().with_strategy(BuildStrategy::entry_blocks("moving"));
    /// let report = CatalogBuilder::new(config).unwrap().build(source).unwrap();
    ///
    /// let record = report.catalog.find("move_x").unwrap();
    /// assert_eq!(record.category, "moving");
    /// assert_eq!(record.fields.skeleton.as_deref(), Some("basic"));
    /// ```
    ///
    /// # Errors
    ///
    /// Fails when the anchor is missing or the outer region never closes
    /// (deep span), or when a name repeats under `DuplicatePolicy::Reject`.
    /// No partial catalog is returned on failure.
    pub fn build(&self, input: &str) -> Result<BuildReport> {
        self.build_in(input, None)
    }

    /// Like [`build`](Self::build), but an empty deep-span category falls back
    /// to `fallback` instead of the default label.
    pub(crate) fn build_in(&self, input: &str, fallback: Option<&str>) -> Result<BuildReport> {
        let report = match &self.config.strategy {
            BuildStrategy::LineScan { rules } => self.scan_lines(input, rules)?,
            BuildStrategy::DeepSpan { region, category } => {
                let category = match (category.trim(), fallback) {
                    ("", Some(fallback)) => fallback,
                    ("", None) => DEFAULT_CATEGORY,
                    (fixed, _) => fixed,
                };
                self.scan_region(input, region, category)?
            }
        };

        debug!(
            categories = report.catalog.categories().len(),
            records = report.catalog.len(),
            skipped = report.skipped,
            excluded = report.excluded,
            "catalog built"
        );
        Ok(report)
    }

    fn scan_lines(&self, input: &str, rules: &CategoryRules) -> Result<BuildReport> {
        let mut tracker = CategoryTracker::new(rules);
        let mut assembly = Assembly::new(&self.config);
        let mut line_start = 0;

        for line in input.split_inclusive('\n') {
            let offset = line_start;
            line_start += line.len();

            tracker.process(line);

            let trimmed = line.trim_start();
            let Some(caps) = self.re_line.captures(trimmed) else {
                continue;
            };
            let (Some(whole), Some(name), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };

            let base = offset + (line.len() - trimmed.len());
            let fields = Fields {
                value: Some(value.as_str().to_string()),
                ..Fields::default()
            };
            assembly.push(Record::new(
                name.as_str(),
                fields,
                tracker.current(),
                Span::new(base + whole.start(), base + whole.end()),
            ))?;
        }

        Ok(assembly.finish())
    }

    fn scan_region(&self, input: &str, region: &Region, category: &str) -> Result<BuildReport> {
        let outer = match region {
            Region::Whole => Span::new(0, input.len()),
            Region::Anchored(path) => {
                let anchor = self.spans.locate_path(input, path)?;
                self.spans.find_balanced_span(input, anchor)?
            }
        };
        debug!(span = %outer, "region located");

        // Region bounds sit next to ASCII delimiters or at the text ends.
        let text = &input[outer.range()];
        let split = self.splitter.split(text);

        let mut assembly = Assembly::new(&self.config);
        assembly.report.skipped = split.skipped.len();

        for entry in split.entries {
            let fields = self.fields.extract(&text[entry.inner.range()]);
            assembly.push(Record::new(
                entry.name,
                fields,
                category,
                entry.inner.shift(outer.start),
            ))?;
        }

        Ok(assembly.finish())
    }
}

/// Applies exclusion and duplicate handling while records are collected.
struct Assembly<'c> {
    config: &'c BuilderConfig,
    names: HashSet<String>,
    report: BuildReport,
}

impl<'c> Assembly<'c> {
    fn new(config: &'c BuilderConfig) -> Self {
        Self {
            config,
            names: HashSet::new(),
            report: BuildReport::default(),
        }
    }

    fn push(&mut self, record: Record) -> Result<()> {
        if self.config.exclusions.is_excluded(&record.name) {
            self.report.excluded += 1;
            return Ok(());
        }

        if !self.names.insert(record.name.clone()) {
            match self.config.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(CatalogError::DuplicateRecord {
                        name: record.name,
                        category: record.category,
                    });
                }
                DuplicatePolicy::LastWins => {
                    warn!(name = %record.name, category = %record.category, "replacing duplicate record");
                    self.report.catalog.remove(&record.name);
                }
            }
        }

        self.report.catalog.insert(record);
        Ok(())
    }

    fn finish(self) -> BuildReport {
        self.report
    }
}

/// Convenience function to build a catalog in one call.
///
/// # Errors
///
/// See [`CatalogBuilder::build`].
pub fn build(input: &str, strategy: BuildStrategy, exclusions: ExclusionSet) -> Result<BuildReport> {
    let config = BuilderConfig::new()
        .with_strategy(strategy)
        .with_exclusions(exclusions);
    CatalogBuilder::new(config)?.build(input)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    const NAMES: &[&str] = &[
        "move_direction",
        "move_x",
        "show",
        "hide",
        "show_prompt",
        "check_goal_success",
        "sound_something",
        "repeat_basic",
    ];

    fn line_source(names: &[&str]) -> String {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("// block_cat{}.js\n{name}: \"label {i}\"\n", i % 3))
            .collect()
    }

    fn deep_source(names: &[&str]) -> String {
        let body: Vec<String> = names
            .iter()
            .map(|name| format!("{name}: {{ skeleton: 'basic', func(s) {{ return {{ a: 1 }}; }} }}"))
            .collect();
        format!("getBlocks() {{ return {{ {} }}; }}", body.join(",\n"))
    }

    proptest! {
        #[test]
        fn excluded_names_never_appear(
            present in subsequence(NAMES.to_vec(), 0..=NAMES.len()),
            excluded in subsequence(NAMES.to_vec(), 0..=NAMES.len())
        ) {
            let exclusions: ExclusionSet = excluded.iter().copied().collect();

            for (strategy, input) in [
                (BuildStrategy::line_scan(), line_source(&present)),
                (BuildStrategy::entry_blocks("blocks"), deep_source(&present)),
            ] {
                let report = build(&input, strategy, exclusions.clone()).unwrap();
                for name in &excluded {
                    prop_assert!(!report.catalog.contains(name));
                }
                let kept = present.iter().filter(|n| !exclusions.is_excluded(n)).count();
                prop_assert_eq!(report.catalog.len(), kept);
                prop_assert_eq!(report.excluded, present.len() - kept);
            }
        }

        #[test]
        fn identical_builds_are_deeply_equal(present in subsequence(NAMES.to_vec(), 0..=NAMES.len())) {
            for (strategy, input) in [
                (BuildStrategy::line_scan(), line_source(&present)),
                (BuildStrategy::entry_blocks("blocks"), deep_source(&present)),
            ] {
                let first = build(&input, strategy.clone(), ExclusionSet::new()).unwrap();
                let second = build(&input, strategy, ExclusionSet::new()).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
