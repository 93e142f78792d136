//! Rendered page abstraction.
//!
//! The extractor never talks to a browser directly. It works against two
//! small traits:
//! - [`RenderedPage`]: navigate, wait for a selector, query elements
//! - [`PageElement`]: read attributes and text, query descendants
//!
//! # Implementations
//!
//! | Type | Module | Backing |
//! |------|--------|---------|
//! | [`ChromePage`](chrome::ChromePage) | [`chrome`] | Headless Chromium over CDP (`chromiumoxide`) |
//! | [`SnapshotPage`] | [`snapshot`] | A saved HTML document parsed with `scraper` |
//!
//! Selectors are plain CSS, including attribute substring matches such as
//! `[class*='PublicationList'][class*='listItem']`, so both backings accept
//! the same site profiles.

use std::error::Error;
use std::fmt;
use std::time::Duration;

pub mod chrome;
pub mod snapshot;

pub use chrome::ChromeSession;
pub use snapshot::SnapshotPage;

/// A page whose DOM can be queried once it has rendered.
pub trait RenderedPage {
    /// Handle to an element of this page.
    type Element: PageElement;

    /// Load `url` into the page.
    async fn navigate(&self, url: &str) -> Result<(), Box<dyn Error>>;

    /// Block until `selector` matches at least one element.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::ReadyTimeout`] when nothing matches within `timeout`.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration)
    -> Result<(), Box<dyn Error>>;

    /// First element matching `selector`, if any.
    async fn query_one(&self, selector: &str) -> Result<Option<Self::Element>, Box<dyn Error>>;

    /// Every element matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, Box<dyn Error>>;
}

/// An element handle scoped to a [`RenderedPage`].
pub trait PageElement: Sized {
    /// Value of attribute `name`, or `None` when it is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>, Box<dyn Error>>;

    /// Concatenated text of the element and its descendants (untrimmed).
    async fn text_content(&self) -> Result<String, Box<dyn Error>>;

    /// First descendant matching `selector`, if any.
    async fn query_one(&self, selector: &str) -> Result<Option<Self>, Box<dyn Error>>;

    /// Every descendant matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self>, Box<dyn Error>>;
}

/// Failures raised by page implementations.
#[derive(Debug)]
pub enum BrowserError {
    /// The ready selector did not appear in time.
    ReadyTimeout { selector: String, timeout: Duration },
    /// A selector could not be parsed.
    InvalidSelector { selector: String, reason: String },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ReadyTimeout { selector, timeout } => write!(
                f,
                "selector {selector:?} did not appear within {}s",
                timeout.as_secs_f64()
            ),
            BrowserError::InvalidSelector { selector, reason } => {
                write!(f, "invalid selector {selector:?}: {reason}")
            }
        }
    }
}

impl Error for BrowserError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_timeout_display() {
        let e = BrowserError::ReadyTimeout {
            selector: "[class*='ArticleList']".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            e.to_string(),
            "selector \"[class*='ArticleList']\" did not appear within 30s"
        );
    }

    #[test]
    fn test_invalid_selector_display() {
        let e = BrowserError::InvalidSelector {
            selector: "[[".to_string(),
            reason: "unexpected token".to_string(),
        };
        assert!(e.to_string().contains("invalid selector \"[[\""));
    }
}
