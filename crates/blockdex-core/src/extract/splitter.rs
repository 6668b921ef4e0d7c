//! # Record Splitter
//!
//! Divides a span of object-literal text into its top-level
//! `name: { ... }` entries.

use regex::Regex;
use tracing::warn;

use crate::error::{CatalogError, Result};
use crate::extract::span::DelimiterSpanExtractor;
use crate::types::Span;

/// One top-level entry found by the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEntry {
    /// Identifier preceding the colon.
    pub name: String,
    /// Text strictly inside the entry's braces, relative to the split text.
    pub inner: Span,
}

/// Output of [`RecordSplitter::split`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    /// Entries in scan order.
    pub entries: Vec<SplitEntry>,
    /// Byte offsets of opening delimiters that were never closed.
    pub skipped: Vec<usize>,
}

/// Splits span text into top-level `(name, inner_span)` pairs.
pub struct RecordSplitter {
    re_entry: Regex,
    spans: DelimiterSpanExtractor,
}

impl RecordSplitter {
    /// Constructs a splitter over `{` / `}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::RegexError` if the entry pattern fails to
    /// compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_entry: Regex::new(r"(\w+):\s*\{")?,
            spans: DelimiterSpanExtractor::braces(),
        })
    }

    /// Splits `text` into its top-level entries.
    ///
    /// After a successful match, scanning resumes right after the entry's
    /// closing brace, so nested `name: {` occurrences are never reported.
    /// An entry whose brace never closes is skipped and scanning resumes just
    /// past its opening brace.
    pub fn split(&self, text: &str) -> Split {
        let mut split = Split::default();
        let mut pos = 0;

        while let Some(caps) = self.re_entry.captures_at(text, pos) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let open = whole.end() - 1;

            match self.spans.close_from(text, open) {
                Ok(inner) => {
                    split.entries.push(SplitEntry {
                        name: name.as_str().to_string(),
                        inner,
                    });
                    pos = inner.end + 1;
                }
                Err(CatalogError::Unbalanced { open }) => {
                    warn!(name = name.as_str(), open, "skipping unterminated record");
                    split.skipped.push(open);
                    pos = open + 1;
                }
                Err(_) => {
                    pos = open + 1;
                }
            }
        }

        split
    }
}
