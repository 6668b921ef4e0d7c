//! # Blockdex Core
//!
//! Extracts a catalog of named block definitions from loosely structured
//! object-literal source text: locating the declaration region, splitting it
//! into top-level records by balanced-brace matching, pulling typed fields
//! out of each record, and grouping records by category.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockdex_core::{build, BuildStrategy, ExclusionSet};
//!
//! let source = "// block_start.js\nwhen_run_button_click: \"시작하기 버튼을 클릭했을 때\"\n";
//! let report = build(source, BuildStrategy::line_scan(), ExclusionSet::new()).unwrap();
//!
//! let start = report.catalog.get("start").unwrap();
//! assert_eq!(start[0].name, "when_run_button_click");
//! ```
pub mod batch;
pub mod builder;
pub mod error;
pub mod extract;
pub mod types;

// Re-export primary API
pub use batch::{Document, DocumentReport, build_documents, merge};
pub use builder::{BuildStrategy, BuilderConfig, CatalogBuilder, DuplicatePolicy, Region, build};
pub use error::{CatalogError, Result};
pub use extract::{
    AnchorPath, CategoryRules, CategoryTracker, DelimiterSpanExtractor, ExclusionSet,
    FieldExtractor, RecordSplitter,
};
pub use types::{BuildReport, Catalog, CategoryGroup, Fields, Record, Span};
