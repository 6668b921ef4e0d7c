pub mod catalog;
pub mod record;
pub mod span;

pub use catalog::{BuildReport, Catalog, CategoryGroup};
pub use record::{Fields, Record};
pub use span::Span;
