//! Request routing types for the crawl queue.

use crate::models::FilmRecord;

/// Parse routine a fetched page is dispatched to.
///
/// The rating variant carries the partially-filled record across the
/// dependent request, so the continuation is an explicit value instead of
/// shared state.
#[derive(Debug, Clone)]
pub enum ParseJob {
    /// Paginated category listing.
    Listing,
    /// A film article page.
    FilmPage,
    /// Rating-database entry for a film whose fields are already extracted.
    ImdbRating { record: FilmRecord },
}

/// A follow-up fetch emitted by a parse function.
///
/// The href may be relative; the engine resolves it against the URL of the
/// response that produced it.
#[derive(Debug, Clone)]
pub struct FollowRequest {
    pub href: String,
    pub job: ParseJob,
    /// Bypass the duplicate-URL filter. Rating lookups set this: the same
    /// database URL may legitimately be visited once per film.
    pub dont_filter: bool,
}

impl FollowRequest {
    pub fn new(href: impl Into<String>, job: ParseJob) -> Self {
        Self {
            href: href.into(),
            job,
            dont_filter: false,
        }
    }

    pub fn unfiltered(href: impl Into<String>, job: ParseJob) -> Self {
        Self {
            dont_filter: true,
            ..Self::new(href, job)
        }
    }
}

/// What a parse function produced: finalized records and new requests.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub items: Vec<FilmRecord>,
    pub requests: Vec<FollowRequest>,
}

impl ParseOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: FilmRecord) {
        self.items.push(item);
    }

    pub fn add_request(&mut self, request: FollowRequest) {
        self.requests.push(request);
    }

    /// Split into records and requests for dispatch.
    pub fn into_parts(self) -> (Vec<FilmRecord>, Vec<FollowRequest>) {
        (self.items, self.requests)
    }
}
