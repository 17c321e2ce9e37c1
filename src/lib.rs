//! kinoscrape - film catalog scraper.
//!
//! Crawls a paginated category listing of film articles on the
//! Russian-language encyclopedia, extracts structured metadata for each
//! film, and enriches every record with an audience rating from the
//! rating-database page the article links to.

pub mod cli;
pub mod config;
pub mod models;
pub mod scrapers;
pub mod sink;
