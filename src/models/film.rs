//! Film record model.

use serde::{Deserialize, Serialize};

/// One film scraped from the encyclopedia catalog.
///
/// Every slot is optional: a field whose label row is missing on the source
/// page stays `None`, and the record is emitted regardless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilmRecord {
    /// Film title in Russian, truncated before any parenthesized suffix.
    pub title: Option<String>,
    /// Comma-joined genres, deduplicated case-insensitively.
    pub genre: Option<String>,
    /// Comma-joined director names, at most three.
    pub director: Option<String>,
    /// Comma-joined production countries.
    pub country: Option<String>,
    /// Four-digit release year.
    pub year: Option<String>,
    /// Audience rating from the rating database, verbatim.
    pub imdb_rating: Option<String>,
}
