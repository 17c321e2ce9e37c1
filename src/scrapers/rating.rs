//! Rating-database page parsing.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::warn;

use crate::models::FilmRecord;

static STRUCTURED_DATA: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("static selector")
});
static RATING_SCORE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-testid="hero-rating-bar__aggregate-rating__score"] span"#)
        .expect("static selector")
});
// Generated class names rotate with frontend deployments; last verified
// against the markup this selector was written for.
static RATING_SCORE_FALLBACK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".sc-bde20123-1.cMEQkK").expect("static selector"));

/// Fill the rating slot from the rating-database page and finalize the
/// carried record. Never fails: the worst case leaves the slot empty.
pub(crate) fn parse_rating_page(doc: &Html, mut record: FilmRecord, page_url: &str) -> FilmRecord {
    let mut rating = structured_data_rating(doc, page_url);

    if rating.is_none() {
        rating = first_selector_text(doc, &RATING_SCORE);
    }
    if rating.is_none() {
        rating = first_selector_text(doc, &RATING_SCORE_FALLBACK);
    }

    record.imdb_rating = rating;
    record
}

/// Rating from the embedded schema.org payload, when present and well
/// formed. Malformed payloads are logged and skipped, never propagated.
fn structured_data_rating(doc: &Html, page_url: &str) -> Option<String> {
    let script = doc.select(&STRUCTURED_DATA).next()?;
    let payload: String = script.text().collect();

    let data: Value = match serde_json::from_str(&payload) {
        Ok(data) => data,
        Err(err) => {
            warn!("failed to parse structured data on {}: {}", page_url, err);
            return None;
        }
    };

    match &data {
        Value::Object(object) => {
            let is_movie = object.get("@type").and_then(Value::as_str) == Some("Movie");
            if is_movie || object.contains_key("aggregateRating") {
                rating_value(&data)
            } else {
                None
            }
        }
        Value::Array(entries) => entries
            .iter()
            .find(|entry| entry.get("@type").and_then(Value::as_str) == Some("Movie"))
            .and_then(rating_value),
        _ => None,
    }
}

/// The nested `aggregateRating.ratingValue`, rendered to text whether the
/// emitter wrote it as a string or a number.
fn rating_value(entry: &Value) -> Option<String> {
    match entry.get("aggregateRating")?.get("ratingValue")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_selector_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|element| element.text().next().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://www.imdb.com/title/tt0083658/";

    fn resolve(html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        parse_rating_page(&doc, FilmRecord::default(), PAGE_URL).imdb_rating
    }

    #[test]
    fn test_structured_data_object() {
        let html = r#"<script type="application/ld+json">
            {"@type":"Movie","aggregateRating":{"ratingValue":8.1}}
        </script>"#;
        assert_eq!(resolve(html).as_deref(), Some("8.1"));
    }

    #[test]
    fn test_structured_data_object_without_type_tag() {
        let html = r#"<script type="application/ld+json">
            {"aggregateRating":{"ratingValue":"7.4"}}
        </script>"#;
        assert_eq!(resolve(html).as_deref(), Some("7.4"));
    }

    #[test]
    fn test_structured_data_list_picks_first_movie() {
        let html = r#"<script type="application/ld+json">
            [{"@type":"Person","name":"кто-то"},
             {"@type":"Movie","aggregateRating":{"ratingValue":"7.9"}},
             {"@type":"Movie","aggregateRating":{"ratingValue":"1.0"}}]
        </script>"#;
        assert_eq!(resolve(html).as_deref(), Some("7.9"));
    }

    #[test]
    fn test_absent_structured_data_uses_primary_selector() {
        let html = r#"<div data-testid="hero-rating-bar__aggregate-rating__score">
            <span>8.3</span><span>/10</span>
        </div>"#;
        assert_eq!(resolve(html).as_deref(), Some("8.3"));
    }

    #[test]
    fn test_malformed_structured_data_falls_back() {
        let html = r#"<script type="application/ld+json">{not json</script>
            <div data-testid="hero-rating-bar__aggregate-rating__score"><span>6.7</span></div>"#;
        assert_eq!(resolve(html).as_deref(), Some("6.7"));
    }

    #[test]
    fn test_second_fallback_selector() {
        let html = r#"<span class="sc-bde20123-1 cMEQkK">7.2</span>"#;
        assert_eq!(resolve(html).as_deref(), Some("7.2"));
    }

    #[test]
    fn test_all_sources_missing_leaves_rating_absent() {
        let record = FilmRecord {
            title: Some("Фильм".to_string()),
            ..FilmRecord::default()
        };
        let doc = Html::parse_document("<html><body><p>нет рейтинга</p></body></html>");
        let finalized = parse_rating_page(&doc, record, PAGE_URL);
        assert_eq!(finalized.imdb_rating, None);
        assert_eq!(finalized.title.as_deref(), Some("Фильм"));
    }

    #[test]
    fn test_non_movie_structured_data_falls_through() {
        let html = r#"<script type="application/ld+json">
            {"@type":"TVSeries","aggregateRating2":{"ratingValue":"9.9"}}
        </script>
        <span class="sc-bde20123-1 cMEQkK">5.5</span>"#;
        assert_eq!(resolve(html).as_deref(), Some("5.5"));
    }
}
