//! Data models for scraped articles and the feeds built from them.
//!
//! - [`Article`]: one listing entry discovered on a rendered page
//! - [`FeedMetadata`]: channel-level information for a serialized feed
//!
//! Articles are built once during extraction and never updated; each run
//! produces a fresh collection that is dropped after the feed is written.

use chrono::{DateTime, FixedOffset};

/// A single article listing scraped from a site.
///
/// Fields are private so a record cannot change after the extractor has
/// deduplicated and sorted the collection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    title: String,
    url: String,
    published: DateTime<FixedOffset>,
    raw_date: Option<String>,
}

impl Article {
    /// Build a record. `title` is trimmed; `url` must already be absolute.
    pub fn new(
        title: impl AsRef<str>,
        url: impl Into<String>,
        published: DateTime<FixedOffset>,
        raw_date: Option<String>,
    ) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            url: url.into(),
            published,
            raw_date,
        }
    }

    /// The trimmed headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Absolute URL of the article; unique within one extraction run.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Normalized publication instant (UTC when the page gave no zone).
    pub fn published(&self) -> DateTime<FixedOffset> {
        self.published
    }

    /// Date text exactly as it appeared on the page, kept for diagnostics.
    pub fn raw_date(&self) -> Option<&str> {
        self.raw_date.as_deref()
    }
}

/// Channel-level metadata for one feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    /// Channel title.
    pub title: String,
    /// Channel description.
    pub description: String,
    /// Language code such as `en`.
    pub language: String,
    /// The listing page the feed mirrors (alternate link).
    pub link: String,
    /// Public location of the feed file itself.
    pub self_link: String,
}
