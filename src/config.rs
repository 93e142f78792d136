//! Site profiles: where to look on each page, expressed as data.
//!
//! A [`FeedConfig`] lists the sites to scrape. Each [`SiteProfile`] names the
//! page, the selector that signals it has rendered, and an ordered list of
//! [`Zone`]s describing the regions holding article cards. When the target
//! site changes its markup, only these selectors need updating.
//!
//! Profiles come either from the built-in defaults ([`FeedConfig::builtin`])
//! or from a YAML file:
//!
//! ```yaml
//! version: 1
//! feed_base_url: https://example.com/feeds
//! sites:
//!   - name: engineering
//!     url: https://www.anthropic.com/engineering
//!     origin: https://www.anthropic.com
//!     ready: "[class*='ArticleList'][class*='article']"
//!     feed:
//!       title: Anthropic Engineering Blog
//!       description: Latest engineering posts from Anthropic
//!       output: anthropic_engineering_rss.xml
//!     zones:
//!       - label: articles
//!         container: "[class*='ArticleList'][class*='article']"
//!         link: { selector: "a[class*='cardLink']" }
//!         content: "[class*='content']"
//!         title: [h2, h3]
//!         date: "[class*='date']"
//!         seen: on_link
//! ```

use crate::models::FeedMetadata;
use crate::scrapers::{engineering, news};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

/// Profile schema version understood by this build.
pub const PROFILE_VERSION: u32 = 1;

/// Where the generated files are published.
pub const DEFAULT_FEED_BASE_URL: &str =
    "https://raw.githubusercontent.com/taobojlen/anthropic-rss-feed/main";

/// Every site to scrape in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Schema version; must equal [`PROFILE_VERSION`].
    pub version: u32,
    /// Public base URL the output files are served from.
    #[serde(default = "default_feed_base_url")]
    pub feed_base_url: String,
    /// Sites in the order they are scraped.
    pub sites: Vec<SiteProfile>,
}

/// One listing page and the feed produced from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Short identifier used in logs, `--site` and snapshot file names.
    pub name: String,
    /// Page to render; also the feed's alternate link.
    pub url: String,
    /// Base for resolving relative hrefs.
    pub origin: String,
    /// Selector whose presence means the listing has rendered.
    pub ready: String,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
    pub feed: FeedSettings,
    /// Regions visited in order; earlier zones win URL collisions.
    pub zones: Vec<Zone>,
}

/// Channel settings for one site's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSettings {
    pub title: String,
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Output file name, relative to the output directory.
    pub output: String,
}

/// A structurally distinct region of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Name used in log lines.
    pub label: String,
    /// Selector for the article card containers.
    pub container: String,
    /// Only use the first container (e.g. a single hero item).
    #[serde(default)]
    pub first_only: bool,
    #[serde(default)]
    pub link: LinkSource,
    /// Scope inside the container for title and date lookups.
    #[serde(default)]
    pub content: Option<String>,
    /// Title selectors tried in order.
    pub title: Vec<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Skip cards without a date instead of dating them "now".
    #[serde(default)]
    pub date_required: bool,
    #[serde(default)]
    pub seen: SeenPolicy,
}

/// Where a card's link lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSource {
    /// Descendant holding the link; `None` reads it from the container itself.
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default = "default_link_attribute")]
    pub attribute: String,
}

impl Default for LinkSource {
    fn default() -> Self {
        Self {
            selector: None,
            attribute: default_link_attribute(),
        }
    }
}

/// When a card's URL is added to the run's seen-set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeenPolicy {
    /// Once the article has been accepted.
    #[default]
    OnAccept,
    /// As soon as the link resolves, even if the card is later skipped.
    OnLink,
}

fn default_feed_base_url() -> String {
    DEFAULT_FEED_BASE_URL.to_string()
}

fn default_ready_timeout_secs() -> u64 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

fn default_link_attribute() -> String {
    "href".to_string()
}

impl FeedConfig {
    /// The news and engineering profiles.
    pub fn builtin() -> Self {
        Self {
            version: PROFILE_VERSION,
            feed_base_url: default_feed_base_url(),
            sites: vec![news::profile(), engineering::profile()],
        }
    }

    /// Parse and validate a YAML profile document.
    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        let config: FeedConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to the built-in profiles.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).await?;
                let config = Self::from_yaml(&text)?;
                info!(path, sites = config.sites.len(), "Loaded site profiles");
                Ok(config)
            }
            None => {
                info!("Using built-in site profiles");
                Ok(Self::builtin())
            }
        }
    }

    /// Check the schema version and the invariants the extractor relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.version != PROFILE_VERSION {
            return Err(format!(
                "unsupported profile version {} (expected {PROFILE_VERSION})",
                self.version
            ));
        }
        if self.sites.is_empty() {
            return Err("no sites configured".to_string());
        }
        for (i, site) in self.sites.iter().enumerate() {
            if self.sites[..i].iter().any(|other| other.name == site.name) {
                return Err(format!("duplicate site name {:?}", site.name));
            }
            if self.sites[..i].iter().any(|other| other.feed.output == site.feed.output) {
                return Err(format!("duplicate output file {:?}", site.feed.output));
            }
            url::Url::parse(&site.origin)
                .map_err(|e| format!("site {:?}: bad origin {:?}: {e}", site.name, site.origin))?;
            for zone in &site.zones {
                if zone.title.is_empty() {
                    return Err(format!(
                        "site {:?} zone {:?}: at least one title selector is required",
                        site.name, zone.label
                    ));
                }
            }
        }
        Ok(())
    }

    /// Keep only the sites named in `names` (all of them when `names` is empty).
    pub fn select_sites(&self, names: &[String]) -> Result<Vec<&SiteProfile>, String> {
        if names.is_empty() {
            return Ok(self.sites.iter().collect());
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.sites.iter().any(|site| &site.name == *name))
        {
            return Err(format!("unknown site {unknown:?}"));
        }
        Ok(self
            .sites
            .iter()
            .filter(|site| names.contains(&site.name))
            .collect())
    }
}

impl SiteProfile {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    /// Channel metadata for this site's feed published under `feed_base_url`.
    pub fn feed_metadata(&self, feed_base_url: &str) -> FeedMetadata {
        FeedMetadata {
            title: self.feed.title.clone(),
            description: self.feed.description.clone(),
            language: self.feed.language.clone(),
            link: self.url.clone(),
            self_link: format!("{}/{}", feed_base_url.trim_end_matches('/'), self.feed.output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
version: 1
sites:
  - name: engineering
    url: https://www.anthropic.com/engineering
    origin: https://www.anthropic.com
    ready: "[class*='ArticleList'][class*='article']"
    feed:
      title: Anthropic Engineering Blog
      description: Latest engineering posts from Anthropic
      output: anthropic_engineering_rss.xml
    zones:
      - label: articles
        container: "[class*='ArticleList'][class*='article']"
        link: { selector: "a[class*='cardLink']" }
        content: "[class*='content']"
        title: [h2, h3]
        date: "[class*='date']"
        seen: on_link
"#;

    #[test]
    fn test_builtin_profiles_are_valid() {
        let config = FeedConfig::builtin();
        config.validate().unwrap();
        let names: Vec<_> = config.sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["news", "engineering"]);
    }

    #[test]
    fn test_yaml_defaults() {
        let config = FeedConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.feed_base_url, DEFAULT_FEED_BASE_URL);

        let site = &config.sites[0];
        assert_eq!(site.ready_timeout_secs, 30);
        assert_eq!(site.feed.language, "en");

        let zone = &site.zones[0];
        assert_eq!(zone.link.attribute, "href");
        assert_eq!(zone.link.selector.as_deref(), Some("a[class*='cardLink']"));
        assert_eq!(zone.title, vec!["h2", "h3"]);
        assert_eq!(zone.seen, SeenPolicy::OnLink);
        assert!(!zone.first_only);
        assert!(!zone.date_required);
    }

    #[test]
    fn test_yaml_matches_builtin_engineering_profile() {
        let config = FeedConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.sites[0], engineering::profile());
    }

    #[test]
    fn test_builtin_round_trips_through_yaml() {
        let config = FeedConfig::builtin();
        let text = serde_yaml::to_string(&config).unwrap();
        assert_eq!(FeedConfig::from_yaml(&text).unwrap(), config);
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let text = YAML.replace("version: 1", "version: 2");
        let err = FeedConfig::from_yaml(&text).unwrap_err();
        assert!(err.to_string().contains("unsupported profile version 2"));
    }

    #[test]
    fn test_zone_without_title_is_rejected() {
        let text = YAML.replace("title: [h2, h3]", "title: []");
        assert!(FeedConfig::from_yaml(&text).is_err());
    }

    #[test]
    fn test_duplicate_site_names_are_rejected() {
        let mut config = FeedConfig::builtin();
        config.sites[1].name = "news".to_string();
        assert!(config.validate().unwrap_err().contains("duplicate site name"));
    }

    #[test]
    fn test_select_sites() {
        let config = FeedConfig::builtin();
        assert_eq!(config.select_sites(&[]).unwrap().len(), 2);

        let selected = config.select_sites(&["engineering".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "engineering");

        assert!(config.select_sites(&["blog".to_string()]).is_err());
    }

    #[test]
    fn test_feed_metadata_links() {
        let config = FeedConfig::builtin();
        let meta = config.sites[0].feed_metadata("https://feeds.example.com/");
        assert_eq!(meta.link, "https://www.anthropic.com/news");
        assert_eq!(
            meta.self_link,
            "https://feeds.example.com/anthropic_news_rss.xml"
        );
        assert_ne!(meta.link, meta.self_link);
        assert_eq!(meta.title, "Anthropic News");
        assert_eq!(meta.language, "en");
    }
}
