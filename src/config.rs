//! Configuration for kinoscrape.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Category listing crawled when no seed is configured.
pub const DEFAULT_SEED_URL: &str =
    "https://ru.wikipedia.org/wiki/Категория:Фильмы_по_алфавиту";

/// Config filename discovered in the working directory.
const CONFIG_FILENAME: &str = "kinoscrape.toml";

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Category listing URL the crawl starts from.
    pub seed_url: String,
    /// Domains requests may target; subdomains are included. Empty disables
    /// the filter.
    pub allowed_domains: Vec<String>,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Delay between requests in milliseconds.
    pub request_delay_ms: u64,
    /// Output file for scraped records (JSON Lines).
    pub output_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            allowed_domains: vec!["ru.wikipedia.org".to_string(), "imdb.com".to_string()],
            user_agent: "kinoscrape/0.1 (film metadata research)".to_string(),
            request_timeout: 30,
            request_delay_ms: 500,
            output_path: PathBuf::from("films.jsonl"),
        }
    }
}

/// Load settings from an explicit path, the working-directory config file,
/// or defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let candidate = match path {
        Some(explicit) => Some(explicit.to_path_buf()),
        None => {
            let local = PathBuf::from(CONFIG_FILENAME);
            local.exists().then_some(local)
        }
    };

    match candidate {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let settings = toml::from_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?;
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings =
            toml::from_str("seed_url = \"https://example.com/wiki/Category:X\"").unwrap();
        assert_eq!(settings.seed_url, "https://example.com/wiki/Category:X");
        assert_eq!(settings.request_delay_ms, 500);
        assert_eq!(
            settings.allowed_domains,
            vec!["ru.wikipedia.org".to_string(), "imdb.com".to_string()]
        );
    }

    #[test]
    fn test_default_seed_points_at_film_category() {
        let settings = Settings::default();
        assert!(settings.seed_url.contains("Фильмы_по_алфавиту"));
    }
}
