pub mod error;
pub mod fetcher;
pub mod page_cache;

pub use error::{CacheError, FetchError};
pub use fetcher::PageFetcher;
pub use page_cache::PageCache;
