//! Anthropic news listing.
//!
//! The [news page](https://www.anthropic.com/news) shows a featured grid (one
//! hero card plus a column of side links) above the full publication list.
//! Class names carry build hashes (`PublicationList_listItem__x1y2z`), so
//! every selector matches on class substrings. Featured cards are listed
//! first so that they win over their duplicate in the publication list.
//! Cards without a visible date are skipped.

use crate::config::{FeedSettings, LinkSource, SeenPolicy, SiteProfile, Zone};

pub const PAGE_URL: &str = "https://www.anthropic.com/news";
pub const OUTPUT_FILE: &str = "anthropic_news_rss.xml";

const LIST_ITEM: &str = "[class*='PublicationList'][class*='listItem']";

/// Built-in profile for the news page.
pub fn profile() -> SiteProfile {
    SiteProfile {
        name: "news".to_string(),
        url: PAGE_URL.to_string(),
        origin: super::ORIGIN.to_string(),
        ready: LIST_ITEM.to_string(),
        ready_timeout_secs: 30,
        feed: FeedSettings {
            title: "Anthropic News".to_string(),
            description: "Latest news and announcements from Anthropic".to_string(),
            language: "en".to_string(),
            output: OUTPUT_FILE.to_string(),
        },
        zones: vec![
            dated_zone("featured", "[class*='FeaturedGrid'][class*='content']", "h2", true),
            dated_zone(
                "featured-side",
                "[class*='FeaturedGrid'][class*='sideLink']",
                "[class*='title']",
                false,
            ),
            dated_zone("list", LIST_ITEM, "[class*='title']", false),
        ],
    }
}

/// A zone whose container is the link itself and whose cards carry a `<time>`.
fn dated_zone(label: &str, container: &str, title: &str, first_only: bool) -> Zone {
    Zone {
        label: label.to_string(),
        container: container.to_string(),
        first_only,
        link: LinkSource::default(),
        content: None,
        title: vec![title.to_string()],
        date: Some("time".to_string()),
        date_required: true,
        seen: SeenPolicy::OnAccept,
    }
}
