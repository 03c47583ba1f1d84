//! Page engines: the DOM capability the extraction pipeline runs against.
//!
//! A [`BrowserSession`] hands out isolated [`PageContext`]s. A page context
//! navigates, waits for readiness, and returns the rendered document as HTML;
//! extraction then runs selector queries over that snapshot.

pub mod http;
pub mod idle;

#[cfg(feature = "chromium")]
pub mod chromium;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpBrowser;
pub use idle::NetworkIdleTracker;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumBrowser;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// The load event fired.
    Load,
    /// At most `max_inflight` requests were seen during a `quiet` window.
    NetworkIdle { max_inflight: usize, quiet: Duration },
}

impl WaitUntil {
    /// "Mostly idle": no more than two connections for 500ms.
    pub fn network_idle2() -> Self {
        WaitUntil::NetworkIdle { max_inflight: 2, quiet: Duration::from_millis(500) }
    }
}

impl Default for WaitUntil {
    fn default() -> Self {
        Self::network_idle2()
    }
}

/// Trait for page engines - enables mocking for tests.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Opens a new isolated page context. The caller must close it.
    async fn new_page(&self) -> Result<Box<dyn PageContext>>;
}

/// One open page (tab) of a browser session.
#[async_trait]
pub trait PageContext: Send + Sync {
    /// Navigates to `url` and waits for the given condition.
    async fn goto(&mut self, url: &str, wait_until: WaitUntil) -> Result<()>;

    /// Waits until `selector` matches in the current document.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Returns the current document as HTML.
    async fn content(&self) -> Result<String>;

    /// Releases the page. Further calls fail.
    async fn close(&mut self) -> Result<()>;
}

/// Returns whether `selector` matches anything in `html`.
pub fn document_matches(html: &str, selector: &str) -> Result<bool> {
    let selector = Selector::parse(selector)
        .map_err(|e| anyhow::anyhow!("{:?}", e))
        .with_context(|| format!("Invalid selector: {}", selector))?;

    Ok(Html::parse_document(html).select(&selector).next().is_some())
}
