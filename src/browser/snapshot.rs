//! Static HTML pages.
//!
//! [`SnapshotPage`] serves an already-rendered document (for example one
//! saved from a browser's "Save page as") through the [`RenderedPage`]
//! traits, so the extractor can be run offline against a known page.
//! Navigation is a no-op and waiting succeeds only if the selector is
//! already present.

use super::{BrowserError, PageElement, RenderedPage};
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::debug;

/// A parsed HTML document exposed as a rendered page.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotPage<'a> {
    document: &'a Html,
}

impl<'a> SnapshotPage<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self { document }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|e| BrowserError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl<'a> RenderedPage for SnapshotPage<'a> {
    type Element = ElementRef<'a>;

    async fn navigate(&self, url: &str) -> Result<(), Box<dyn Error>> {
        debug!(%url, "Snapshot page; navigation skipped");
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), Box<dyn Error>> {
        let parsed = parse_selector(selector)?;
        if self.document.select(&parsed).next().is_some() {
            Ok(())
        } else {
            Err(BrowserError::ReadyTimeout {
                selector: selector.to_string(),
                timeout,
            }
            .into())
        }
    }

    async fn query_one(&self, selector: &str) -> Result<Option<Self::Element>, Box<dyn Error>> {
        let parsed = parse_selector(selector)?;
        Ok(self.document.select(&parsed).next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, Box<dyn Error>> {
        let parsed = parse_selector(selector)?;
        Ok(self.document.select(&parsed).collect())
    }
}

impl<'a> PageElement for ElementRef<'a> {
    async fn attribute(&self, name: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.value().attr(name).map(str::to_string))
    }

    async fn text_content(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.text().collect())
    }

    async fn query_one(&self, selector: &str) -> Result<Option<Self>, Box<dyn Error>> {
        let parsed = parse_selector(selector)?;
        Ok(self.select(&parsed).next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self>, Box<dyn Error>> {
        let parsed = parse_selector(selector)?;
        Ok(self.select(&parsed).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <ul class="List_list__x1">
            <li class="List_item__a"><a href="/one"><span class="title">One</span></a></li>
            <li class="List_item__a"><a href="/two"><span class="title"> Two <b>bold</b></span></a></li>
          </ul>
        </body></html>
    "#;

    #[tokio::test]
    async fn test_query_all_in_document_order() {
        let html = Html::parse_document(PAGE);
        let page = SnapshotPage::new(&html);

        let items = page.query_all("[class*='List_item']").await.unwrap();
        assert_eq!(items.len(), 2);

        let link = items[1].query_one("a").await.unwrap().unwrap();
        assert_eq!(link.attribute("href").await.unwrap().as_deref(), Some("/two"));
        assert_eq!(link.attribute("rel").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_text_content_includes_descendants() {
        let html = Html::parse_document(PAGE);
        let page = SnapshotPage::new(&html);

        let titles = page.query_all(".title").await.unwrap();
        assert_eq!(titles[1].text_content().await.unwrap(), " Two bold");
    }

    #[tokio::test]
    async fn test_wait_for_present_selector() {
        let html = Html::parse_document(PAGE);
        let page = SnapshotPage::new(&html);
        page.wait_for_selector("[class*='List_list']", Duration::from_secs(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_missing_selector_times_out() {
        let html = Html::parse_document(PAGE);
        let page = SnapshotPage::new(&html);
        let err = page
            .wait_for_selector(".missing", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.to_string().contains(".missing"));
    }

    #[tokio::test]
    async fn test_invalid_selector_is_an_error() {
        let html = Html::parse_document(PAGE);
        let page = SnapshotPage::new(&html);
        assert!(page.query_all("[[").await.is_err());
        assert!(page.query_one("[[").await.is_err());
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let html = Html::parse_document(PAGE);
        let page = SnapshotPage::new(&html);
        assert!(page.query_all("article").await.unwrap().is_empty());
        assert!(page.query_one("article").await.unwrap().is_none());
    }
}
