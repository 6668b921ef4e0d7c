use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default label used before any category marker has been seen.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// How category markers are recognized and turned into labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    /// Comment marker that starts a category line.
    pub marker: String,
    /// File-extension suffixes stripped from a marker label (first match).
    pub suffixes: Vec<String>,
    /// Prefix token stripped from a marker label if present.
    pub prefix: String,
    /// Label in effect before the first marker.
    pub default_label: String,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            marker: "//".into(),
            suffixes: vec![".js".into()],
            prefix: "block_".into(),
            default_label: DEFAULT_CATEGORY.into(),
        }
    }
}

impl CategoryRules {
    /// Turns a raw marker text or document name into a category label:
    /// trims whitespace, strips a known suffix, then the prefix token.
    ///
    /// Returns `None` if nothing is left.
    ///
    /// ```
    /// use blockdex_core::CategoryRules;
    ///
    /// let rules = CategoryRules::default();
    /// assert_eq!(rules.normalize(" block_moving.js ").as_deref(), Some("moving"));
    /// assert_eq!(rules.normalize("looks").as_deref(), Some("looks"));
    /// assert_eq!(rules.normalize("block_.js"), None);
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let mut label = raw.trim();
        if let Some(stripped) = self
            .suffixes
            .iter()
            .find_map(|suffix| label.strip_suffix(suffix.as_str()))
        {
            label = stripped;
        }
        if !self.prefix.is_empty() {
            label = label.strip_prefix(self.prefix.as_str()).unwrap_or(label);
        }

        let label = label.trim();
        if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        }
    }

    /// Label carried by `line` if it is a category marker line.
    #[must_use]
    pub fn marker_label(&self, line: &str) -> Option<String> {
        if self.marker.is_empty() {
            return None;
        }
        line.trim()
            .strip_prefix(self.marker.as_str())
            .and_then(|rest| self.normalize(rest))
    }
}

/// Running category label driven by a stream of lines.
///
/// Owned by the line loop that feeds it; there is no shared state between
/// trackers.
#[derive(Debug, Clone)]
pub struct CategoryTracker<'r> {
    rules: &'r CategoryRules,
    current: String,
}

impl<'r> CategoryTracker<'r> {
    #[must_use]
    pub fn new(rules: &'r CategoryRules) -> Self {
        Self {
            rules,
            current: rules.default_label.clone(),
        }
    }

    /// Feeds one line. Marker lines replace the current label; every other
    /// line, and markers that normalize to nothing, leave it unchanged.
    pub fn process(&mut self, line: &str) {
        if let Some(label) = self.rules.marker_label(line) {
            trace!(from = %self.current, to = %label, "category marker");
            self.current = label;
        }
    }

    /// The label in effect after the lines processed so far.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }
}
