pub mod crawl;
pub mod error;
pub mod extract;

pub use crawl::{CrawlIter, Crawler};
pub use error::ScrapeError;
