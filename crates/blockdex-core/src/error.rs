use thiserror::Error;

/// Errors that can occur while building a block catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required anchor token does not occur in the input.
    #[error("anchor not found: {anchor:?}")]
    AnchorNotFound {
        /// The anchor token that was searched for.
        anchor: String,
    },

    /// No opening delimiter exists at or after the search offset.
    #[error("no opening delimiter at or after byte {from}")]
    MissingDelimiter {
        /// Byte offset the scan started from.
        from: usize,
    },

    /// An opening delimiter is never closed before the end of the text.
    #[error("unbalanced delimiter opened at byte {open}")]
    Unbalanced {
        /// Byte offset of the unmatched opening delimiter.
        open: usize,
    },

    /// Two records with the same name were found under `DuplicatePolicy::Reject`.
    #[error("duplicate record {name:?} (category {category:?})")]
    DuplicateRecord {
        /// The repeated record name.
        name: String,
        /// Category of the second occurrence.
        category: String,
    },

    /// The builder configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Result type alias for blockdex operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
