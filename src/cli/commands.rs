//! CLI commands implementation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{load_settings, Settings};
use crate::scrapers::{FilmCrawler, HttpClient};
use crate::sink::JsonLinesSink;

#[derive(Parser)]
#[command(name = "kino")]
#[command(about = "Film catalog scraper for the Russian-language encyclopedia")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the film category listing and scrape film records
    Crawl {
        /// Seed category URL (overrides config)
        seed: Option<String>,
        /// Limit number of pages to fetch (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,
        /// Output file for JSON Lines records (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

/// Parse arguments and dispatch to the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Crawl {
            seed,
            limit,
            output,
        } => cmd_crawl(&settings, seed, limit, output).await,
        Commands::Config => cmd_config(&settings),
    }
}

/// Walk the category listing, scraping every film article it links.
async fn cmd_crawl(
    settings: &Settings,
    seed: Option<String>,
    limit: usize,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(|| settings.seed_url.clone());
    let output = output.unwrap_or_else(|| settings.output_path.clone());

    let client = HttpClient::new(
        &settings.user_agent,
        Duration::from_secs(settings.request_timeout),
        Duration::from_millis(settings.request_delay_ms),
    )?;
    let crawler = FilmCrawler::new(client, settings.allowed_domains.clone(), limit);

    let mut sink = JsonLinesSink::create(&output)
        .with_context(|| format!("failed to create output file {}", output.display()))?;

    println!("{} Crawling {}", style("→").cyan(), seed);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static template"),
    );
    pb.set_message("Scraping film pages...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let stats = crawler.run(&seed, &mut sink).await?;

    pb.finish_and_clear();

    println!("{} Crawl complete", style("✓").green());
    println!("{:<22} {}", "Pages Fetched:", stats.pages_fetched);
    println!("{:<22} {}", "Records Written:", stats.records_emitted);
    println!("{:<22} {}", "Fetch Failures:", stats.fetch_failures);
    println!("{:<22} {}", "Duplicates Filtered:", stats.duplicates_filtered);
    println!("{:<22} {}", "Offsite Filtered:", stats.offsite_filtered);
    println!("{:<22} {}", "Output:", output.display());

    Ok(())
}

/// Print the effective configuration as TOML.
fn cmd_config(settings: &Settings) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(settings)?;
    print!("{rendered}");
    Ok(())
}
