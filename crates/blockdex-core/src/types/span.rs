use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into a source text.
///
/// A span produced by the delimiter scanner covers the text strictly inside
/// one balanced delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Creates a span; `end` is clamped so it never precedes `start`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    /// Moves a span that is relative to some region into the region's
    /// coordinate space, `offset` being the region's own start.
    #[must_use]
    pub fn shift(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Returns the covered text, or `None` if the span does not fit `text`
    /// or does not fall on character boundaries.
    #[must_use]
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(self.range())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(3, 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert_eq!(span.range(), 3..8);
        assert_eq!(span.to_string(), "3..8");
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn span_new_clamps_reversed_bounds() {
        let span = Span::new(9, 2);
        assert_eq!(span, Span { start: 9, end: 9 });
    }

    #[test]
    fn span_shift_and_slice() {
        let text = "outer { inner }";
        let local = Span::new(1, 6);
        let absolute = local.shift(7);
        assert_eq!(absolute.slice(text), Some("inner"));
        assert_eq!(Span::new(10, 40).slice(text), None);
    }
}
