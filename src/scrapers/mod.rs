//! Article extraction from rendered listing pages.
//!
//! Extraction follows the same steps for every site; only the
//! [`SiteProfile`] differs:
//!
//! 1. **Render**: navigate to the page and wait for the ready selector
//! 2. **Collect**: visit each [`Zone`] in order and turn its cards into [`Article`]s
//! 3. **Order**: sort the records newest first
//!
//! # Sites
//!
//! | Site | Module | Output |
//! |------|--------|--------|
//! | News | [`news`] | `anthropic_news_rss.xml` |
//! | Engineering | [`engineering`] | `anthropic_engineering_rss.xml` |
//!
//! # Failure handling
//!
//! - A missing ready selector or a failed navigation aborts the site.
//! - A card that cannot be read is logged and skipped; the remaining cards
//!   are still processed.
//! - A URL is kept the first time it is seen in a run, so featured cards
//!   (listed in earlier zones) win over their copies further down the page.

use crate::browser::{PageElement, RenderedPage};
use crate::config::{SeenPolicy, SiteProfile, Zone};
use crate::dates::normalize_date;
use crate::models::Article;
use crate::utils::{resolve_url, truncate_for_log};
use chrono::Utc;
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub mod engineering;
pub mod news;

/// Origin relative hrefs on the built-in sites resolve against.
pub const ORIGIN: &str = "https://www.anthropic.com";

/// Render `profile.url` on `page` and extract its articles.
///
/// # Errors
///
/// Fails when navigation fails, the ready selector does not appear within
/// the profile's timeout, or a zone's container query fails. Problems with
/// individual cards never fail the extraction.
#[instrument(level = "info", skip_all, fields(site = %profile.name, url = %profile.url))]
pub async fn extract<P: RenderedPage>(
    page: &P,
    profile: &SiteProfile,
) -> Result<Vec<Article>, Box<dyn Error>> {
    page.navigate(&profile.url).await?;
    page.wait_for_selector(&profile.ready, profile.ready_timeout())
        .await?;
    collect_articles(page, profile).await
}

/// Extract articles from a page that has already rendered.
///
/// Returns records with unique URLs, sorted by publication instant, newest
/// first. Records with equal instants keep their discovery order.
pub async fn collect_articles<P: RenderedPage>(
    page: &P,
    profile: &SiteProfile,
) -> Result<Vec<Article>, Box<dyn Error>> {
    let origin = Url::parse(&profile.origin)?;
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for zone in &profile.zones {
        let containers = if zone.first_only {
            page.query_one(&zone.container).await?.into_iter().collect()
        } else {
            page.query_all(&zone.container).await?
        };
        debug!(zone = %zone.label, count = containers.len(), "Matched zone containers");

        for (index, container) in containers.iter().enumerate() {
            match extract_card(container, zone, &origin, &mut seen).await {
                Ok(Some(article)) => {
                    info!(
                        site = %profile.name,
                        zone = %zone.label,
                        title = %truncate_for_log(article.title(), 120),
                        date = article.raw_date().unwrap_or("(undated, using now)"),
                        "Found article"
                    );
                    articles.push(article);
                }
                Ok(None) => {}
                Err(e) => warn!(
                    site = %profile.name,
                    zone = %zone.label,
                    index,
                    error = %e,
                    "Failed to process card; skipping"
                ),
            }
        }
    }

    articles.sort_by(|a, b| b.published().cmp(&a.published()));
    info!(site = %profile.name, count = articles.len(), "Extracted articles");
    Ok(articles)
}

/// Turn one card into an article. `Ok(None)` means the card was skipped.
async fn extract_card<E: PageElement>(
    container: &E,
    zone: &Zone,
    origin: &Url,
    seen: &mut HashSet<String>,
) -> Result<Option<Article>, Box<dyn Error>> {
    let href = match &zone.link.selector {
        Some(selector) => match container.query_one(selector).await? {
            Some(link) => link.attribute(&zone.link.attribute).await?,
            None => None,
        },
        None => container.attribute(&zone.link.attribute).await?,
    };
    let Some(href) = href.filter(|href| !href.trim().is_empty()) else {
        debug!(zone = %zone.label, "Card has no link; skipping");
        return Ok(None);
    };

    let url = resolve_url(&href, origin)?;
    if seen.contains(&url) {
        debug!(zone = %zone.label, %url, "Already seen; skipping");
        return Ok(None);
    }
    if zone.seen == SeenPolicy::OnLink {
        seen.insert(url.clone());
    }

    let scoped;
    let scope = match &zone.content {
        Some(selector) => match container.query_one(selector).await? {
            Some(content) => {
                scoped = content;
                &scoped
            }
            None => {
                debug!(zone = %zone.label, %url, "Card has no content block; skipping");
                return Ok(None);
            }
        },
        None => container,
    };

    let Some(title) = first_text(scope, &zone.title).await? else {
        debug!(zone = %zone.label, %url, "Card has no title; skipping");
        return Ok(None);
    };

    let date_text = match &zone.date {
        Some(selector) => match scope.query_one(selector).await? {
            Some(date) => Some(date.text_content().await?.trim().to_string()),
            None => None,
        },
        None => None,
    };
    let (published, raw_date) = match date_text {
        Some(text) => (normalize_date(&text), Some(text)),
        None if zone.date_required => {
            debug!(zone = %zone.label, %url, "Card has no date; skipping");
            return Ok(None);
        }
        None => (Utc::now().fixed_offset(), None),
    };

    seen.insert(url.clone());
    Ok(Some(Article::new(title, url, published, raw_date)))
}

/// Trimmed text of the first selector that yields any.
async fn first_text<E: PageElement>(
    scope: &E,
    selectors: &[String],
) -> Result<Option<String>, Box<dyn Error>> {
    for selector in selectors {
        if let Some(element) = scope.query_one(selector).await? {
            let text = element.text_content().await?;
            let text = text.trim();
            if !text.is_empty() {
                return Ok(Some(text.to_string()));
            }
        }
    }
    Ok(None)
}
