pub mod category;
pub mod exclusion;
pub mod fields;
pub mod span;
pub mod splitter;

pub use category::{CategoryRules, CategoryTracker, DEFAULT_CATEGORY};
pub use exclusion::{ENTRY_ADMIN_BLOCKS, ExclusionSet};
pub use fields::FieldExtractor;
pub use span::{AnchorPath, DelimiterSpanExtractor};
pub use splitter::{RecordSplitter, Split, SplitEntry};
