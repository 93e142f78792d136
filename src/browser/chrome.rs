//! Headless Chromium pages driven over the DevTools protocol.
//!
//! [`ChromeSession`] owns the browser process (or a connection to a remote
//! one) and the task that pumps its event stream. [`ChromePage`] wraps one
//! tab and implements [`RenderedPage`].
//!
//! # Waiting
//!
//! CDP has no native "wait for selector", so [`ChromePage::wait_for_selector`]
//! polls `querySelectorAll` every [`POLL_INTERVAL`] until a match appears or
//! the timeout expires.

use super::{BrowserError, PageElement, RenderedPage};
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::{Stream, StreamExt};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

/// Delay between ready-selector probes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Timeout for individual CDP requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A running (or connected) Chromium instance.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    launched: bool,
}

impl ChromeSession {
    /// Launch a headless Chromium, or connect to `remote_debugging_url` when given.
    #[instrument(level = "info")]
    pub async fn start(remote_debugging_url: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let (browser, mut handler) = match remote_debugging_url {
            Some(url) => {
                info!(%url, "Connecting to remote Chromium");
                Browser::connect(url).await?
            }
            None => {
                let config = BrowserConfig::builder()
                    .no_sandbox()
                    .request_timeout(REQUEST_TIMEOUT)
                    .arg("--disable-gpu")
                    .arg("--disable-dev-shm-usage")
                    .build()?;
                info!("Launching headless Chromium");
                Browser::launch(config).await?
            }
        };

        let handler = tokio::spawn(async move {
            let events = pump_events(&mut handler).await;
            debug!(events, "Browser event stream ended");
        });

        Ok(Self {
            browser,
            handler,
            launched: remote_debugging_url.is_none(),
        })
    }

    /// Open a blank tab.
    pub async fn new_page(&self) -> Result<ChromePage, Box<dyn Error>> {
        let page = self.browser.new_page("about:blank").await?;
        Ok(ChromePage { page })
    }

    /// Shut the browser down. A remote browser is left running.
    #[instrument(level = "info", skip_all)]
    pub async fn close(mut self) -> Result<(), Box<dyn Error>> {
        if self.launched {
            self.browser.close().await?;
            if let Err(e) = self.browser.wait().await {
                warn!(error = %e, "Chromium did not exit cleanly");
            }
        }
        self.handler.abort();
        info!("Browser session closed");
        Ok(())
    }
}

/// Drive the CDP handler until its stream closes.
///
/// Handler errors (for example CDP events this client cannot decode) are
/// logged and skipped; the stream must keep being polled for later requests
/// to complete. Returns the number of events seen.
async fn pump_events<S, E>(events: &mut S) -> usize
where
    S: Stream<Item = Result<(), E>> + Unpin,
    E: fmt::Display,
{
    let mut seen = 0;
    while let Some(event) = events.next().await {
        seen += 1;
        if let Err(e) = event {
            debug!(error = %e, "Browser handler error; continuing");
        }
    }
    seen
}

/// One browser tab.
pub struct ChromePage {
    page: Page,
}

impl RenderedPage for ChromePage {
    type Element = ChromeElement;

    #[instrument(level = "info", skip(self))]
    async fn navigate(&self, url: &str) -> Result<(), Box<dyn Error>> {
        self.page.goto(url).await?;
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn wait_for_selector(
        &self,
        selector: &str,
        limit: Duration,
    ) -> Result<(), Box<dyn Error>> {
        let poll = async {
            loop {
                match self.page.find_elements(selector).await {
                    Ok(found) if !found.is_empty() => return,
                    Ok(_) => {}
                    Err(e) => debug!(error = %e, "Ready probe failed; retrying"),
                }
                sleep(POLL_INTERVAL).await;
            }
        };

        match timeout(limit, poll).await {
            Ok(()) => {
                debug!("Ready selector present");
                Ok(())
            }
            Err(_) => Err(BrowserError::ReadyTimeout {
                selector: selector.to_string(),
                timeout: limit,
            }
            .into()),
        }
    }

    async fn query_one(&self, selector: &str) -> Result<Option<Self::Element>, Box<dyn Error>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, Box<dyn Error>> {
        let found = self.page.find_elements(selector).await?;
        Ok(found.into_iter().map(ChromeElement).collect())
    }
}

/// A DOM node inside a [`ChromePage`].
pub struct ChromeElement(Element);

impl PageElement for ChromeElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.0.attribute(name).await?)
    }

    async fn text_content(&self) -> Result<String, Box<dyn Error>> {
        let returns = self
            .0
            .call_js_fn("function() { return this.textContent; }", false)
            .await?;
        let text = returns
            .result
            .value
            .and_then(|value: serde_json::Value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        Ok(text)
    }

    async fn query_one(&self, selector: &str) -> Result<Option<Self>, Box<dyn Error>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Self>, Box<dyn Error>> {
        let found = self.0.find_elements(selector).await?;
        Ok(found.into_iter().map(ChromeElement).collect())
    }
}
