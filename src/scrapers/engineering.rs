//! Anthropic engineering blog listing.
//!
//! The [engineering page](https://www.anthropic.com/engineering) is a single
//! article list. The first card is a featured post with an `h2` headline and
//! no date; the rest use `h3` and show a date. Undated cards are stamped
//! with the extraction time, which places them at the top of the feed.

use crate::config::{FeedSettings, LinkSource, SeenPolicy, SiteProfile, Zone};

pub const PAGE_URL: &str = "https://www.anthropic.com/engineering";
pub const OUTPUT_FILE: &str = "anthropic_engineering_rss.xml";

const ARTICLE: &str = "[class*='ArticleList'][class*='article']";

/// Built-in profile for the engineering page.
pub fn profile() -> SiteProfile {
    SiteProfile {
        name: "engineering".to_string(),
        url: PAGE_URL.to_string(),
        origin: super::ORIGIN.to_string(),
        ready: ARTICLE.to_string(),
        ready_timeout_secs: 30,
        feed: FeedSettings {
            title: "Anthropic Engineering Blog".to_string(),
            description: "Latest engineering posts from Anthropic".to_string(),
            language: "en".to_string(),
            output: OUTPUT_FILE.to_string(),
        },
        zones: vec![Zone {
            label: "articles".to_string(),
            container: ARTICLE.to_string(),
            first_only: false,
            link: LinkSource {
                selector: Some("a[class*='cardLink']".to_string()),
                attribute: "href".to_string(),
            },
            content: Some("[class*='content']".to_string()),
            title: vec!["h2".to_string(), "h3".to_string()],
            date: Some("[class*='date']".to_string()),
            date_required: false,
            seen: SeenPolicy::OnLink,
        }],
    }
}
