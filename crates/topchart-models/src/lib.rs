pub mod categories;
pub mod config;
pub mod record;

pub use categories::CategoryRegistry;
pub use config::{CacheConfig, CrawlConfig, HttpConfig, StoreConfig, TopchartConfig};
pub use record::{MediaKind, MediaRecord, MovieRecord, ShowRecord};
