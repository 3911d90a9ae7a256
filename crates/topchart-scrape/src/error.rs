use thiserror::Error;
use topchart_cache::FetchError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("no top-rated chart link found for {0}")]
    ChartNotFound(String),
}
