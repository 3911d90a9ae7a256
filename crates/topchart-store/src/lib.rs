pub mod catalog;
pub mod error;
pub mod queries;
pub mod schema;

pub use catalog::Catalog;
pub use error::StoreError;
pub use queries::{GroupAverage, MovieRow, QueryEngine, Report, ReportKind, ShowRow};
