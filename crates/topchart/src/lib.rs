//! topchart - top-rated chart scraper and catalog.
//!
//! Crawls the top-rated movie and TV show charts of a movie-database
//! site, extracts structured records from the detail pages through a
//! persistent request cache, normalizes categorical fields against fixed
//! dimension tables, and stores everything in a SQLite catalog for
//! aggregate reporting.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use topchart::models::{CategoryRegistry, MediaKind, TopchartConfig};
//! use topchart::store::{Catalog, QueryEngine, ReportKind};
//!
//! let config = TopchartConfig::default();
//! let registry = CategoryRegistry::new();
//! let mut fetcher = topchart::build_fetcher(&config).unwrap();
//! let mut catalog = Catalog::open(&config.store.db_path).unwrap();
//! topchart::ingest_top_rated(
//!     &mut fetcher, &mut catalog, &registry, &config, MediaKind::Movies, 50,
//! )
//! .unwrap();
//! let report = QueryEngine::new(&catalog).run(ReportKind::MovieRatingByGenre).unwrap();
//! # let _ = report;
//! ```

pub use topchart_cache as cache;
pub use topchart_models as models;
pub use topchart_scrape as scrape;
pub use topchart_store as store;

use anyhow::Context;
use topchart_cache::{PageCache, PageFetcher};
use topchart_models::record::{MediaKind, MediaRecord};
use topchart_models::{CategoryRegistry, TopchartConfig};
use topchart_scrape::Crawler;
use topchart_store::Catalog;

/// Build a page fetcher over the configured persistent cache.
pub fn build_fetcher(config: &TopchartConfig) -> anyhow::Result<PageFetcher> {
    let cache = PageCache::load(&config.cache.path);
    PageFetcher::new(cache, &config.http).context("Failed to build HTTP client")
}

/// Open the configured catalog database and (re)initialize its schema.
pub fn open_catalog(config: &TopchartConfig) -> anyhow::Result<Catalog> {
    Catalog::open(&config.store.db_path)
        .with_context(|| format!("Failed to open catalog: {}", config.store.db_path))
}

/// Crawl the top-rated chart for `kind`, bounded by `max_items`, and
/// ingest every extracted record into the catalog.
///
/// A failed detail fetch is logged and skipped without aborting the
/// batch; a failed catalog write aborts, since every later insert would
/// fail the same way. Returns the ingested records in listing order.
pub fn ingest_top_rated(
    fetcher: &mut PageFetcher,
    catalog: &mut Catalog,
    registry: &CategoryRegistry,
    config: &TopchartConfig,
    kind: MediaKind,
    max_items: usize,
) -> anyhow::Result<Vec<MediaRecord>> {
    let mut crawler = Crawler::new(fetcher, registry, &config.http.base_url)?;
    let listing_url = crawler
        .chart_url(kind)
        .with_context(|| format!("No chart link for {kind}"))?;

    let mut records = Vec::new();
    for result in crawler.crawl(&listing_url, kind, max_items)? {
        match result {
            Ok(record) => {
                catalog
                    .ingest(&record, registry)
                    .with_context(|| format!("Failed to store {:?}", record.title()))?;
                records.push(record);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping title after fetch failure");
            }
        }
    }

    tracing::info!(kind = %kind, ingested = records.len(), "Ingest finished");
    Ok(records)
}
