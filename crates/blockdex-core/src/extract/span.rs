//! # Delimiter Span Extraction
//!
//! Locates anchor tokens and closes balanced delimiter pairs with a single
//! forward counting scan.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::types::Span;

/// Ordered chain of anchor tokens.
///
/// Each token is searched from the offset of the previous match, so
/// `["getBlocks()", "return {"]` finds the first `return {` that follows
/// `getBlocks()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorPath(Vec<String>);

impl AnchorPath {
    #[must_use]
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Anchor for Entry block source files: the object literal returned by
    /// `getBlocks()`.
    #[must_use]
    pub fn entry_get_blocks() -> Self {
        Self::new(["getBlocks()", "return {"])
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> From<Vec<S>> for AnchorPath {
    fn from(tokens: Vec<S>) -> Self {
        Self::new(tokens)
    }
}

/// Finds anchors and balanced spans over a pair of ASCII delimiters.
///
/// Counting is purely character level: delimiters inside quoted strings are
/// counted like any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterSpanExtractor {
    open: u8,
    close: u8,
}

impl Default for DelimiterSpanExtractor {
    fn default() -> Self {
        Self::braces()
    }
}

impl DelimiterSpanExtractor {
    /// Extractor for `{` / `}`.
    #[must_use]
    pub fn braces() -> Self {
        Self {
            open: b'{',
            close: b'}',
        }
    }

    /// Extractor for an arbitrary pair of ASCII delimiters.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidConfig` if either delimiter is not ASCII
    /// or both are the same character.
    pub fn with_delimiters(open: char, close: char) -> Result<Self> {
        if !open.is_ascii() || !close.is_ascii() || open == close {
            return Err(CatalogError::InvalidConfig(format!(
                "delimiters must be two distinct ASCII characters, got {open:?} and {close:?}"
            )));
        }
        Ok(Self {
            open: open as u8,
            close: close as u8,
        })
    }

    /// Byte offset of the first occurrence of `token` in `text`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::AnchorNotFound` if `token` does not occur.
    pub fn locate_anchor(&self, text: &str, token: &str) -> Result<usize> {
        self.locate_from(text, token, 0)
    }

    /// Resolves every token of `path` in turn and returns the offset of the
    /// last one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::AnchorNotFound` for the first token that cannot
    /// be located, and `CatalogError::InvalidConfig` for an empty path.
    pub fn locate_path(&self, text: &str, path: &AnchorPath) -> Result<usize> {
        if path.is_empty() {
            return Err(CatalogError::InvalidConfig("anchor path is empty".into()));
        }

        let mut offset = 0;
        for token in path.tokens() {
            offset = self.locate_from(text, token, offset)?;
        }
        debug!(offset, tokens = path.tokens().len(), "anchor located");
        Ok(offset)
    }

    fn locate_from(&self, text: &str, token: &str, from: usize) -> Result<usize> {
        text.get(from..)
            .and_then(|rest| rest.find(token))
            .map(|pos| from + pos)
            .ok_or_else(|| CatalogError::AnchorNotFound {
                anchor: token.to_string(),
            })
    }

    /// Returns the span strictly inside the first balanced delimiter pair
    /// that opens at or after `search_from`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingDelimiter` if no opening delimiter
    /// follows `search_from`, and `CatalogError::Unbalanced` if the text ends
    /// before the opening delimiter is closed.
    pub fn find_balanced_span(&self, text: &str, search_from: usize) -> Result<Span> {
        let bytes = text.as_bytes();
        let open = bytes
            .get(search_from..)
            .and_then(|rest| rest.iter().position(|&b| b == self.open))
            .map(|pos| search_from + pos)
            .ok_or(CatalogError::MissingDelimiter { from: search_from })?;

        self.close_from(text, open)
    }

    /// Closes the opening delimiter located exactly at `open`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingDelimiter` if the byte at `open` is not
    /// the opening delimiter, and `CatalogError::Unbalanced` if it is never
    /// closed.
    pub fn close_from(&self, text: &str, open: usize) -> Result<Span> {
        let bytes = text.as_bytes();
        if bytes.get(open) != Some(&self.open) {
            return Err(CatalogError::MissingDelimiter { from: open });
        }

        let mut depth = 0usize;
        for (idx, &b) in bytes.iter().enumerate().skip(open) {
            if b == self.open {
                depth += 1;
            } else if b == self.close {
                depth -= 1;
                if depth == 0 {
                    return Ok(Span::new(open + 1, idx));
                }
            }
        }

        Err(CatalogError::Unbalanced { open })
    }
}
