//! # anthropic_feeds
//!
//! Generates RSS 2.0 feeds for the Anthropic news and engineering listing
//! pages. Both pages are rendered client-side, so each one is loaded in a
//! headless Chromium, the article cards are read out of the live DOM, and
//! the result is written as one RSS file per site.
//!
//! ## Usage
//!
//! ```sh
//! anthropic_feeds -o ./feeds
//! ```
//!
//! ## Architecture
//!
//! Each site runs through the same pipeline:
//! 1. **Render**: navigate and wait for the profile's ready selector
//! 2. **Extract**: walk the profile's zones and build deduplicated articles
//! 3. **Serialize**: sort newest first and render the RSS document
//! 4. **Output**: write the file into the output directory
//!
//! Sites are independent: a failing site is logged and the remaining sites
//! still run, but the process exits non-zero.

use clap::Parser;
use scraper::Html;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod dates;
mod models;
mod outputs;
mod scrapers;
mod utils;

use browser::{ChromeSession, RenderedPage, SnapshotPage};
use cli::Cli;
use config::{FeedConfig, SiteProfile};
use outputs::rss;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("anthropic_feeds starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = FeedConfig::load(args.config.as_deref()).await?;
    let sites = config.select_sites(&args.site)?;
    ensure_writable_dir(&args.output_dir).await?;

    let mut failed = Vec::new();
    match args.snapshot_dir.as_deref() {
        Some(dir) => {
            for site in &sites {
                let result =
                    run_snapshot_site(dir, site, &config.feed_base_url, &args.output_dir).await;
                record(site, result, &mut failed);
            }
        }
        None => {
            let session = ChromeSession::start(args.remote_debugging_url.as_deref()).await?;
            let page = session.new_page().await?;
            for site in &sites {
                let result = run_site(&page, site, &config.feed_base_url, &args.output_dir).await;
                record(site, result, &mut failed);
            }
            session.close().await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        sites = sites.len(),
        failed = failed.len(),
        "Execution complete"
    );

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} site(s) failed: {}", failed.len(), failed.join(", ")).into())
    }
}

fn record(site: &SiteProfile, result: Result<PathBuf, Box<dyn Error>>, failed: &mut Vec<String>) {
    match result {
        Ok(path) => info!(site = %site.name, path = %path.display(), "Feed updated"),
        Err(e) => {
            error!(site = %site.name, error = %e, "Site failed; previous feed left in place");
            failed.push(site.name.clone());
        }
    }
}

/// Render, extract, serialize and write one site's feed.
#[instrument(level = "info", skip_all, fields(site = %site.name))]
async fn run_site<P: RenderedPage>(
    page: &P,
    site: &SiteProfile,
    feed_base_url: &str,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let articles = scrapers::extract(page, site).await?;
    info!(count = articles.len(), "Extracted articles");

    let bytes = rss::build_feed(&articles, &site.feed_metadata(feed_base_url))?;
    rss::write_feed(output_dir, &site.feed.output, &bytes).await
}

/// [`run_site`] against the saved page `<dir>/<site name>.html`.
async fn run_snapshot_site(
    dir: &str,
    site: &SiteProfile,
    feed_base_url: &str,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = Path::new(dir).join(format!("{}.html", site.name));
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| format!("reading snapshot {}: {e}", path.display()))?;
    let document = Html::parse_document(&text);
    run_site(&SnapshotPage::new(&document), site, feed_base_url, output_dir).await
}
