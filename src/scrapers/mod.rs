//! Two-stage film scraping pipeline.
//!
//! A listing walker discovers film articles from a paginated category
//! listing, a film-page extractor pulls structured fields out of each
//! article's infobox, and a rating resolver enriches the record from the
//! rating-database page the article links to. The stages compose only
//! through follow-up requests queued on the crawl engine.

mod engine;
mod fields;
mod film_page;
mod http_client;
mod listing;
mod rating;
mod request;

pub use engine::{CrawlStats, FilmCrawler, PageFetcher};
pub use http_client::HttpClient;
pub use request::{FollowRequest, ParseJob, ParseOutput};

use thiserror::Error;

/// Errors surfaced by the crawl pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
