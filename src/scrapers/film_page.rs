//! Film article parsing: infobox field extraction and rating-link dispatch.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::fields::{self, Scope};
use super::request::{FollowRequest, ParseJob, ParseOutput};
use crate::models::FilmRecord;

static INFOBOX: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"table[class*="infobox"]"#).expect("static selector"));
static TITLE_MAIN: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1#firstHeading span.mw-page-title-main").expect("static selector")
});
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1#firstHeading").expect("static selector"));
static IMDB_TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="imdb.com/title/tt"]"#).expect("static selector"));

/// Parse a film article into a record.
///
/// The record is emitted directly when the page has no rating-database
/// link; otherwise it is deferred through a rating lookup request carrying
/// the record as context.
pub(crate) fn parse_film_page(doc: &Html) -> ParseOutput {
    let mut output = ParseOutput::new();

    let scope = match doc.select(&INFOBOX).next() {
        Some(table) => Scope::Table(table),
        None => Scope::Document(doc),
    };

    let record = FilmRecord {
        title: extract_title(doc),
        genre: fields::extract(scope, &fields::GENRE),
        director: fields::extract(scope, &fields::DIRECTOR),
        country: fields::extract(scope, &fields::COUNTRY),
        year: fields::extract(scope, &fields::YEAR),
        imdb_rating: None,
    };

    match doc
        .select(&IMDB_TITLE_LINK)
        .find_map(|anchor| anchor.value().attr("href"))
    {
        Some(href) => {
            output.add_request(FollowRequest::unfiltered(
                href,
                ParseJob::ImdbRating { record },
            ));
        }
        None => output.add_item(record),
    }

    output
}

/// Page title: the dedicated title element truncated before any
/// parenthesized disambiguator, else the raw heading text.
fn extract_title(doc: &Html) -> Option<String> {
    if let Some(raw) = doc.select(&TITLE_MAIN).find_map(first_text) {
        let title = match raw.split_once('(') {
            Some((before, _)) => before.trim().to_string(),
            None => raw.trim().to_string(),
        };
        return Some(title);
    }
    doc.select(&HEADING).next().and_then(first_text)
}

/// First direct text node of an element.
fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .find_map(|child| child.value().as_text().map(|text| text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film_page(heading: &str, infobox_rows: &str, trailer: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>{heading}<table class="infobox wikitable"><tbody>{infobox_rows}</tbody></table>{trailer}</body></html>"#
        ))
    }

    const FULL_INFOBOX: &str = r#"
        <tr><th>Жанр</th><td><a href="/g">неонуар</a>, <span>научная фантастика</span></td></tr>
        <tr><th>Режиссёр</th><td><a>Ридли Скотт</a></td></tr>
        <tr><th>Страна</th><td><a>США</a>, Гонконг</td></tr>
        <tr><th>Год</th><td><span>1982</span></td></tr>
    "#;

    #[test]
    fn test_title_truncated_before_parenthesis() {
        let doc = film_page(
            r#"<h1 id="firstHeading"><span class="mw-page-title-main">Бегущий по лезвию (1982)</span></h1>"#,
            FULL_INFOBOX,
            "",
        );
        let output = parse_film_page(&doc);
        assert_eq!(
            output.items[0].title.as_deref(),
            Some("Бегущий по лезвию")
        );
    }

    #[test]
    fn test_title_falls_back_to_raw_heading() {
        let doc = film_page(
            r#"<h1 id="firstHeading">Бегущий по лезвию (1982)</h1>"#,
            FULL_INFOBOX,
            "",
        );
        let output = parse_film_page(&doc);
        assert_eq!(
            output.items[0].title.as_deref(),
            Some("Бегущий по лезвию (1982)")
        );
    }

    #[test]
    fn test_infobox_fields_extracted() {
        let doc = film_page(
            r#"<h1 id="firstHeading"><span class="mw-page-title-main">Бегущий по лезвию</span></h1>"#,
            FULL_INFOBOX,
            "",
        );
        let output = parse_film_page(&doc);
        let record = &output.items[0];
        assert_eq!(record.genre.as_deref(), Some("Неонуар, Научная фантастика"));
        assert_eq!(record.director.as_deref(), Some("Ридли Скотт"));
        assert_eq!(record.country.as_deref(), Some("США, Гонконг"));
        assert_eq!(record.year.as_deref(), Some("1982"));
        assert_eq!(record.imdb_rating, None);
    }

    #[test]
    fn test_rating_link_defers_record() {
        let doc = film_page(
            r#"<h1 id="firstHeading"><span class="mw-page-title-main">Бегущий по лезвию</span></h1>"#,
            FULL_INFOBOX,
            r#"<a href="https://www.imdb.com/title/tt0083658/">IMDb</a>"#,
        );
        let output = parse_film_page(&doc);
        assert!(output.items.is_empty());
        assert_eq!(output.requests.len(), 1);
        let request = &output.requests[0];
        assert!(request.dont_filter);
        assert_eq!(request.href, "https://www.imdb.com/title/tt0083658/");
        match &request.job {
            ParseJob::ImdbRating { record } => {
                assert_eq!(record.year.as_deref(), Some("1982"));
                assert_eq!(record.imdb_rating, None);
            }
            other => panic!("unexpected job: {other:?}"),
        }
    }

    #[test]
    fn test_page_without_infobox_searches_whole_page() {
        let doc = Html::parse_document(
            r#"<html><body>
                <h1 id="firstHeading">Без карточки</h1>
                <table><tbody><tr><th>Жанр</th><td><a>драма</a></td></tr></tbody></table>
            </body></html>"#,
        );
        let output = parse_film_page(&doc);
        let record = &output.items[0];
        assert_eq!(record.title.as_deref(), Some("Без карточки"));
        assert_eq!(record.genre.as_deref(), Some("Драма"));
        assert_eq!(record.country, None);
        assert_eq!(record.year, None);
    }

    #[test]
    fn test_bare_page_yields_empty_record() {
        let doc = Html::parse_document("<html><body><p>Ничего</p></body></html>");
        let output = parse_film_page(&doc);
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0], FilmRecord::default());
    }
}
