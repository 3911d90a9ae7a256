//! Chart discovery and the bounded listing crawl.

use std::collections::{HashMap, HashSet};

use scraper::{Html, Selector};
use topchart_cache::PageFetcher;
use topchart_models::record::{MediaKind, MediaRecord};
use topchart_models::CategoryRegistry;
use url::Url;

use crate::error::ScrapeError;
use crate::extract;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Walks the top-rated listing pages and turns detail links into records.
///
/// All page loads go through the fetcher's cache, so a re-run of the same
/// crawl touches the network only for URLs it has never seen.
pub struct Crawler<'a> {
    fetcher: &'a mut PageFetcher,
    registry: &'a CategoryRegistry,
    base_url: Url,
}

impl<'a> Crawler<'a> {
    pub fn new(
        fetcher: &'a mut PageFetcher,
        registry: &'a CategoryRegistry,
        base_url: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            fetcher,
            registry,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Scan the site navigation for the top-rated chart entries.
    ///
    /// Returns whatever charts were found; an entry can be absent if the
    /// navigation markup changed.
    pub fn discover_chart_urls(&mut self) -> Result<HashMap<MediaKind, String>, ScrapeError> {
        let body = self.fetcher.get_or_fetch(self.base_url.as_str())?;
        let doc = Html::parse_document(&body);

        let mut charts = HashMap::new();
        for item in doc.select(&selector("a.ipc-list__item")) {
            let label = item.text().collect::<String>().trim().to_string();
            let kind = match label.as_str() {
                "Top Rated Movies" => MediaKind::Movies,
                "Top Rated Shows" | "Top Rated TV Shows" => MediaKind::Shows,
                _ => continue,
            };
            let Some(href) = item.value().attr("href") else {
                continue;
            };
            let url = self.base_url.join(href)?;
            charts.entry(kind).or_insert_with(|| url.to_string());
        }

        tracing::debug!(found = charts.len(), "Discovered chart links");
        Ok(charts)
    }

    /// The chart URL for a single kind, or `ChartNotFound`.
    pub fn chart_url(&mut self, kind: MediaKind) -> Result<String, ScrapeError> {
        self.discover_chart_urls()?
            .remove(&kind)
            .ok_or_else(|| ScrapeError::ChartNotFound(kind.to_string()))
    }

    /// Fetch the listing once and lazily yield up to `max_items` records
    /// in listing order. `max_items == 0` yields nothing. A failed detail
    /// fetch yields an `Err` item and the iteration continues; the batch
    /// never aborts.
    pub fn crawl(
        &mut self,
        listing_url: &str,
        kind: MediaKind,
        max_items: usize,
    ) -> Result<CrawlIter<'_, 'a>, ScrapeError> {
        let links = if max_items == 0 {
            Vec::new()
        } else {
            self.listing_links(listing_url, max_items)?
        };
        tracing::info!(listing_url, kind = %kind, links = links.len(), "Starting crawl");
        Ok(CrawlIter {
            crawler: self,
            kind,
            links: links.into_iter(),
        })
    }

    /// Detail-page URLs from the listing table, in document order,
    /// deduplicated, bounded by `max_items`.
    fn listing_links(
        &mut self,
        listing_url: &str,
        max_items: usize,
    ) -> Result<Vec<String>, ScrapeError> {
        let body = self.fetcher.get_or_fetch(listing_url)?;
        let doc = Html::parse_document(&body);

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for anchor in doc.select(&selector(".lister-list td.titleColumn a")) {
            if links.len() == max_items {
                break;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let url = self.base_url.join(href)?.to_string();
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }

        if links.is_empty() {
            tracing::warn!(listing_url, "Listing page contained no title links");
        }
        Ok(links)
    }

    fn fetch_record(&mut self, url: &str, kind: MediaKind) -> Result<MediaRecord, ScrapeError> {
        let body = self.fetcher.get_or_fetch(url)?;
        let doc = Html::parse_document(&body);
        Ok(extract::extract(&doc, kind, self.registry))
    }
}

/// Lazy record stream over the discovered detail links.
pub struct CrawlIter<'c, 'a> {
    crawler: &'c mut Crawler<'a>,
    kind: MediaKind,
    links: std::vec::IntoIter<String>,
}

impl Iterator for CrawlIter<'_, '_> {
    type Item = Result<MediaRecord, ScrapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.links.next()?;
        Some(self.crawler.fetch_record(&url, self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topchart_cache::PageCache;
    use topchart_models::config::HttpConfig;

    // Unroutable base so a cache miss fails fast instead of fetching.
    const BASE: &str = "http://127.0.0.1:9";

    const LISTING: &str = r#"
<table><tbody class="lister-list">
<tr><td class="titleColumn"><a href="/title/tt0111161/">The Shawshank Redemption</a></td></tr>
<tr><td class="titleColumn"><a href="/title/tt0068646/">The Godfather</a></td></tr>
<tr><td class="titleColumn"><a href="/title/tt0468569/">The Dark Knight</a></td></tr>
</tbody></table>
"#;

    fn detail(title: &str, year: &str, rating: &str, genre: &str) -> String {
        format!(
            r#"<div class="title_wrapper"><h1>{title} ({year})</h1>
<div class="subtext">{rating} |
<a href="/alt">{title} (original title)</a>
<a href="/g">{genre}</a>
<a href="/r">1 January {year} (USA)</a>
</div></div>
<div class="ratingValue"><span>9.0</span>/10</div>"#
        )
    }

    fn seeded_fetcher(dir: &tempfile::TempDir) -> PageFetcher {
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        cache
            .insert(format!("{BASE}/chart/top/"), LISTING.to_string())
            .unwrap();
        cache
            .insert(
                format!("{BASE}/title/tt0111161/"),
                detail("The Shawshank Redemption", "1994", "R", "Drama"),
            )
            .unwrap();
        cache
            .insert(
                format!("{BASE}/title/tt0068646/"),
                detail("The Godfather", "1972", "R", "Crime"),
            )
            .unwrap();
        cache
            .insert(
                format!("{BASE}/title/tt0468569/"),
                detail("The Dark Knight", "2008", "PG-13", "Action"),
            )
            .unwrap();
        let http = HttpConfig {
            fetch_delay_ms: 0,
            ..HttpConfig::default()
        };
        PageFetcher::new(cache, &http).unwrap()
    }

    fn crawl_titles(max_items: usize) -> Vec<String> {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = seeded_fetcher(&dir);
        let registry = CategoryRegistry::new();
        let mut crawler = Crawler::new(&mut fetcher, &registry, BASE).unwrap();
        let listing = format!("{BASE}/chart/top/");
        crawler
            .crawl(&listing, MediaKind::Movies, max_items)
            .unwrap()
            .map(|r| r.unwrap().title().to_string())
            .collect()
    }

    #[test]
    fn crawl_respects_bound_and_order() {
        assert_eq!(
            crawl_titles(2),
            vec!["The Shawshank Redemption", "The Godfather"]
        );
    }

    #[test]
    fn crawl_yields_all_when_bound_exceeds_links() {
        assert_eq!(crawl_titles(10).len(), 3);
    }

    #[test]
    fn crawl_zero_yields_nothing() {
        assert!(crawl_titles(0).is_empty());
    }

    #[test]
    fn failed_detail_fetch_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        cache
            .insert(format!("{BASE}/chart/top/"), LISTING.to_string())
            .unwrap();
        // Only the second detail page is cached; the others miss and the
        // unroutable base makes the fetch fail.
        cache
            .insert(
                format!("{BASE}/title/tt0068646/"),
                detail("The Godfather", "1972", "R", "Crime"),
            )
            .unwrap();
        let http = HttpConfig {
            fetch_delay_ms: 0,
            ..HttpConfig::default()
        };
        let mut fetcher = PageFetcher::new(cache, &http).unwrap();
        let registry = CategoryRegistry::new();
        let mut crawler = Crawler::new(&mut fetcher, &registry, BASE).unwrap();
        let listing = format!("{BASE}/chart/top/");

        let results: Vec<_> = crawler
            .crawl(&listing, MediaKind::Movies, 3)
            .unwrap()
            .collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().title(), "The Godfather");
        assert!(results[2].is_err());
    }

    #[test]
    fn duplicate_links_are_visited_once() {
        let listing = r#"<tbody class="lister-list">
<td class="titleColumn"><a href="/title/tt0068646/">The Godfather</a></td>
<td class="titleColumn"><a href="/title/tt0068646/">The Godfather again</a></td>
</tbody>"#
            .to_string();
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        cache.insert(format!("{BASE}/chart/top/"), listing).unwrap();
        cache
            .insert(
                format!("{BASE}/title/tt0068646/"),
                detail("The Godfather", "1972", "R", "Crime"),
            )
            .unwrap();
        let http = HttpConfig {
            fetch_delay_ms: 0,
            ..HttpConfig::default()
        };
        let mut fetcher = PageFetcher::new(cache, &http).unwrap();
        let registry = CategoryRegistry::new();
        let mut crawler = Crawler::new(&mut fetcher, &registry, BASE).unwrap();
        let listing_url = format!("{BASE}/chart/top/");

        let records: Vec<_> = crawler
            .crawl(&listing_url, MediaKind::Movies, 10)
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn discover_chart_urls_from_navigation() {
        let nav = r#"
<ul class="ipc-list">
  <a class="ipc-list__item" href="/chart/top/?ref_=nv_mv_250">Top Rated Movies</a>
  <a class="ipc-list__item" href="/chart/toptv/?ref_=nv_tvv_250">Top Rated Shows</a>
  <a class="ipc-list__item" href="/chart/boxoffice/">Box Office</a>
</ul>"#;
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        cache.insert(format!("{BASE}/"), nav.to_string()).unwrap();
        let http = HttpConfig {
            fetch_delay_ms: 0,
            ..HttpConfig::default()
        };
        let mut fetcher = PageFetcher::new(cache, &http).unwrap();
        let registry = CategoryRegistry::new();
        let mut crawler = Crawler::new(&mut fetcher, &registry, BASE).unwrap();

        let charts = crawler.discover_chart_urls().unwrap();
        assert_eq!(
            charts.get(&MediaKind::Movies).map(String::as_str),
            Some("http://127.0.0.1:9/chart/top/?ref_=nv_mv_250")
        );
        assert_eq!(
            charts.get(&MediaKind::Shows).map(String::as_str),
            Some("http://127.0.0.1:9/chart/toptv/?ref_=nv_tvv_250")
        );

        let url = crawler.chart_url(MediaKind::Movies).unwrap();
        assert!(url.ends_with("/chart/top/?ref_=nv_mv_250"));
    }

    #[test]
    fn missing_chart_is_a_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PageCache::empty(dir.path().join("cache.json"));
        cache
            .insert(format!("{BASE}/"), "<html>no navigation</html>".to_string())
            .unwrap();
        let http = HttpConfig {
            fetch_delay_ms: 0,
            ..HttpConfig::default()
        };
        let mut fetcher = PageFetcher::new(cache, &http).unwrap();
        let registry = CategoryRegistry::new();
        let mut crawler = Crawler::new(&mut fetcher, &registry, BASE).unwrap();

        let err = crawler.chart_url(MediaKind::Shows).unwrap_err();
        assert!(matches!(err, ScrapeError::ChartNotFound(_)));
    }
}
