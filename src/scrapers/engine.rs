//! Crawl queue engine: fetch, dispatch, filter, emit.

use std::collections::{HashSet, VecDeque};

use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use super::request::{ParseJob, ParseOutput};
use super::{film_page, listing, rating, ScrapeError};
use crate::sink::RecordSink;

/// Fetches one page body per URL. The engine stays agnostic of transport,
/// retries and encoding.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// A request scheduled on the crawl queue, with its URL already resolved.
struct ScheduledRequest {
    url: Url,
    job: ParseJob,
}

/// Counters reported after a crawl.
#[derive(Debug, Default, Clone)]
pub struct CrawlStats {
    /// Pages fetched successfully.
    pub pages_fetched: usize,
    /// Requests whose fetch failed.
    pub fetch_failures: usize,
    /// Records written to the sink.
    pub records_emitted: usize,
    /// Requests dropped by the duplicate filter.
    pub duplicates_filtered: usize,
    /// Requests dropped by the allowed-domain filter.
    pub offsite_filtered: usize,
}

/// Sequential crawler over the category listing and its film pages.
///
/// Work is a FIFO queue of resolved requests; each response is parsed by
/// the routine its job names, finalized records go to the sink, and new
/// requests are filtered and enqueued.
pub struct FilmCrawler<F: PageFetcher> {
    fetcher: F,
    allowed_domains: Vec<String>,
    page_limit: usize,
}

impl<F: PageFetcher> FilmCrawler<F> {
    /// Create a crawler. An empty `allowed_domains` disables offsite
    /// filtering; a `page_limit` of zero means unlimited.
    pub fn new(fetcher: F, allowed_domains: Vec<String>, page_limit: usize) -> Self {
        Self {
            fetcher,
            allowed_domains,
            page_limit,
        }
    }

    /// Walk the listing from `seed`, writing finalized records to `sink`.
    pub async fn run(
        &self,
        seed: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<CrawlStats, ScrapeError> {
        let seed_url = Url::parse(seed)?;
        let mut stats = CrawlStats::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<ScheduledRequest> = VecDeque::new();

        visited.insert(seed_url.to_string());
        queue.push_back(ScheduledRequest {
            url: seed_url,
            job: ParseJob::Listing,
        });

        while let Some(request) = queue.pop_front() {
            if self.page_limit > 0 && stats.pages_fetched >= self.page_limit {
                info!("page limit {} reached, stopping crawl", self.page_limit);
                drain_deferred(queue, sink, &mut stats)?;
                break;
            }

            let body = match self.fetcher.fetch(request.url.as_str()).await {
                Ok(body) => body,
                Err(err) => {
                    warn!("fetch failed for {}: {}", request.url, err);
                    stats.fetch_failures += 1;
                    // A lost rating page still yields the fields already
                    // extracted from the film page.
                    if let ParseJob::ImdbRating { record } = request.job {
                        sink.write(&record)?;
                        stats.records_emitted += 1;
                    }
                    continue;
                }
            };
            stats.pages_fetched += 1;

            let output = {
                let doc = Html::parse_document(&body);
                match request.job {
                    ParseJob::Listing => listing::parse_listing(&doc),
                    ParseJob::FilmPage => film_page::parse_film_page(&doc),
                    ParseJob::ImdbRating { record } => {
                        let finalized =
                            rating::parse_rating_page(&doc, record, request.url.as_str());
                        let mut output = ParseOutput::new();
                        output.add_item(finalized);
                        output
                    }
                }
            };

            let (items, requests) = output.into_parts();
            for item in items {
                sink.write(&item)?;
                stats.records_emitted += 1;
            }

            for follow in requests {
                let resolved = match request.url.join(&follow.href) {
                    Ok(url) => url,
                    Err(err) => {
                        debug!(
                            "unresolvable href {:?} on {}: {}",
                            follow.href, request.url, err
                        );
                        continue;
                    }
                };
                if !self.domain_allowed(&resolved) {
                    debug!("offsite request dropped: {}", resolved);
                    stats.offsite_filtered += 1;
                    continue;
                }
                if !follow.dont_filter && !visited.insert(resolved.to_string()) {
                    stats.duplicates_filtered += 1;
                    continue;
                }
                queue.push_back(ScheduledRequest {
                    url: resolved,
                    job: follow.job,
                });
            }
        }

        sink.finish()?;
        info!(
            "crawl complete: {} pages fetched, {} records emitted, {} fetch failures",
            stats.pages_fetched, stats.records_emitted, stats.fetch_failures
        );
        Ok(stats)
    }

    fn domain_allowed(&self, url: &Url) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }
        let Some(host) = url.host_str() else {
            return false;
        };
        self.allowed_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")))
    }
}

/// Emit records still carried by queued rating lookups when the crawl
/// stops before fetching them.
fn drain_deferred(
    queue: VecDeque<ScheduledRequest>,
    sink: &mut dyn RecordSink,
    stats: &mut CrawlStats,
) -> Result<(), ScrapeError> {
    for request in queue {
        if let ParseJob::ImdbRating { record } = request.job {
            sink.write(&record)?;
            stats.records_emitted += 1;
        }
    }
    Ok(())
}
