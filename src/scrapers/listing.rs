//! Category listing parsing: film links and pagination.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::request::{FollowRequest, ParseJob, ParseOutput};

/// Anchor text marking the link to the next listing page.
const NEXT_PAGE_LABEL: &str = "Следующая страница";

static FILM_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#mw-pages .mw-category-group ul li a").expect("static selector")
});
static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));

/// Parse one listing page: a film-page request per catalog link, plus at
/// most one pagination request back into the listing.
///
/// A page with neither kind of link yields an empty output and terminates
/// that branch of the walk.
pub(crate) fn parse_listing(doc: &Html) -> ParseOutput {
    let mut output = ParseOutput::new();

    for anchor in doc.select(&FILM_LINKS) {
        if let Some(href) = anchor.value().attr("href") {
            output.add_request(FollowRequest::new(href, ParseJob::FilmPage));
        }
    }

    let next_page = doc
        .select(&ANCHORS)
        .find(|anchor| anchor.text().any(|text| text.contains(NEXT_PAGE_LABEL)));
    if let Some(anchor) = next_page {
        if let Some(href) = anchor.value().attr("href") {
            output.add_request(FollowRequest::new(href, ParseJob::Listing));
        }
    }

    output
}
