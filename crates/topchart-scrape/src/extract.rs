//! Field extraction from title detail pages.
//!
//! Every rule below is an independent fallback policy: a missing or
//! malformed source element yields `None` for that field and nothing else.
//! Extraction is total; a detail page with half its markup gone still
//! produces a complete record with sentinel display values.

use scraper::{ElementRef, Html, Selector};
use topchart_models::record::{MediaKind, MediaRecord, MovieRecord, ShowRecord};
use topchart_models::CategoryRegistry;

fn selector(css: &str) -> Selector {
    // All selectors in this module are static and known-good.
    Selector::parse(css).expect("static selector")
}

fn first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    doc.select(&selector(css)).next()
}

fn collect_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Anchor texts inside the detail container, in document order.
fn detail_links(doc: &Html) -> Vec<String> {
    match first(doc, "div.title_wrapper") {
        Some(wrapper) => wrapper
            .select(&selector("a"))
            .map(collect_text)
            .collect(),
        None => Vec::new(),
    }
}

fn header_text(doc: &Html) -> Option<String> {
    first(doc, "div.title_wrapper h1").map(collect_text).and_then(non_empty)
}

/// First whitespace-delimited token of the subtext bar, e.g. `R` or `TV-MA`.
fn rating_token(doc: &Html) -> Option<String> {
    first(doc, "div.subtext")
        .map(collect_text)
        .and_then(|t| t.split_whitespace().next().map(str::to_string))
}

fn runtime(doc: &Html) -> Option<String> {
    first(doc, "time").map(collect_text).and_then(non_empty)
}

/// Text before the `/` of the rating widget, e.g. `9.2` out of `9.2/10`.
fn numeric_rating(doc: &Html) -> Option<String> {
    first(doc, "div.ratingValue")
        .map(collect_text)
        .and_then(|t| match t.find('/') {
            Some(i) => non_empty(t[..i].trim().to_string()),
            None => non_empty(t),
        })
}

/// Extract a movie record. Total: never fails, missing fields are `None`.
pub fn extract_movie(doc: &Html, registry: &CategoryRegistry) -> MovieRecord {
    let header = header_text(doc);

    // Title is the header up to the trailing parenthesized year.
    let title = header.as_deref().and_then(|h| {
        let head = match h.find('(') {
            Some(i) => &h[..i],
            None => h,
        };
        non_empty(head.trim().to_string())
    });

    // Release year is the 4-character slice after the opening parenthesis.
    let release_year = header
        .as_deref()
        .and_then(|h| h.split_once('('))
        .map(|(_, rest)| rest.chars().take(4).collect::<String>())
        .filter(|y| y.len() == 4);

    // Film certificates must belong to the content rating enumeration;
    // everything else renders as "Not Rated".
    let content_rating = rating_token(doc).filter(|t| registry.is_content_rating(t));

    let links = detail_links(doc);

    // First link is the alternate-title link, last is the country/years
    // link; genres are everything in between.
    let genres = if links.len() > 2 {
        links[1..links.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    let country = links
        .last()
        .and_then(|l| l.split_once('('))
        .and_then(|(_, rest)| non_empty(rest.trim_end_matches(')').trim().to_string()));

    MovieRecord {
        title,
        release_year,
        content_rating,
        genres,
        country,
        runtime: runtime(doc),
        rating: numeric_rating(doc),
    }
}

/// Extract a show record. Total: never fails, missing fields are `None`.
pub fn extract_show(doc: &Html) -> ShowRecord {
    let title = header_text(doc);

    // Television certificates come from a different vocabulary than film
    // ones; a bare `R` on a show page would be a parse artifact, so only
    // `TV-` prefixed tokens are accepted here.
    let content_rating = rating_token(doc).filter(|t| t.contains("TV-"));

    let links = detail_links(doc);

    // Last link reads like "TV Series (2008–2013)"; everything before it
    // is a genre.
    let genres = if links.len() > 1 {
        links[..links.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    let show_type = links
        .last()
        .and_then(|l| match l.find('(') {
            Some(i) => Some(&l[..i]),
            None => Some(l.as_str()),
        })
        .and_then(|t| non_empty(t.trim().to_string()));

    let air_years = links
        .last()
        .and_then(|l| l.split_once('('))
        .and_then(|(_, rest)| non_empty(rest.trim_end_matches(')').trim().to_string()));

    ShowRecord {
        title,
        air_years,
        content_rating,
        genres,
        show_type,
        runtime: runtime(doc),
        rating: numeric_rating(doc),
    }
}

/// Extract a record of the requested kind from a parsed detail page.
pub fn extract(doc: &Html, kind: MediaKind, registry: &CategoryRegistry) -> MediaRecord {
    match kind {
        MediaKind::Movies => MediaRecord::Movie(extract_movie(doc, registry)),
        MediaKind::Shows => MediaRecord::Show(extract_show(doc)),
    }
}
