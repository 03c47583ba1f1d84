//! Opens one page context per URL and brings it to a ready state.

use crate::amazon::selectors::errors;
use crate::browser::{BrowserSession, PageContext, WaitUntil};
use crate::config::Config;
use crate::error::NavigationError;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How navigations wait before a page counts as usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOptions {
    pub wait_until: WaitUntil,
    pub readiness_timeout: Duration,
}

impl NavigationOptions {
    pub fn from_config(config: &Config) -> Self {
        Self { wait_until: config.wait_until(), readiness_timeout: config.readiness_timeout() }
    }
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Opens isolated page contexts on a browser session.
pub struct PageNavigator<'a> {
    session: &'a dyn BrowserSession,
    options: NavigationOptions,
}

impl<'a> PageNavigator<'a> {
    pub fn new(session: &'a dyn BrowserSession, options: NavigationOptions) -> Self {
        Self { session, options }
    }

    /// Opens a fresh page context at `url` and waits for `readiness_selector`.
    ///
    /// On success the caller owns the page through the returned guard. On
    /// failure the page context has already been closed.
    pub async fn open(&self, url: &str, readiness_selector: &str) -> Result<PageGuard, NavigationError> {
        let mut page = self
            .session
            .new_page()
            .await
            .map_err(|e| NavigationError::PageContext { reason: format!("{:#}", e) })?;

        debug!("Opening {}", url);

        if let Err(e) = page.goto(url, self.options.wait_until).await {
            close_quietly(page.as_mut(), url).await;
            return Err(NavigationError::Navigate { url: url.to_string(), reason: format!("{:#}", e) });
        }

        if let Err(e) = page.wait_for_selector(readiness_selector, self.options.readiness_timeout).await {
            // A block page never carries the readiness marker; report it as such
            let blocked = match page.content().await {
                Ok(html) => block_reason(&html),
                Err(_) => None,
            };
            close_quietly(page.as_mut(), url).await;

            return Err(match blocked {
                Some(reason) => NavigationError::Blocked { url: url.to_string(), reason },
                None => NavigationError::NotReady {
                    url: url.to_string(),
                    selector: readiness_selector.to_string(),
                    reason: format!("{:#}", e),
                },
            });
        }

        trace!("{} ready ('{}')", url, readiness_selector);
        Ok(PageGuard { page: Some(page), url: url.to_string() })
    }
}

/// Identifies pages Amazon serves instead of the requested one.
pub fn block_reason(html: &str) -> Option<&'static str> {
    let document = Html::parse_document(html);

    if document.select(&errors::CAPTCHA).next().is_some() {
        Some("CAPTCHA challenge")
    } else if document.select(&errors::DOG_PAGE).next().is_some() {
        Some("service unavailable page")
    } else {
        None
    }
}

async fn close_quietly(page: &mut dyn PageContext, url: &str) {
    if let Err(e) = page.close().await {
        warn!("Failed to close page for {}: {:#}", url, e);
    }
}

/// An open, ready page context. Closed by [`PageGuard::close`], or on drop.
pub struct PageGuard {
    page: Option<Box<dyn PageContext>>,
    url: String,
}

impl std::fmt::Debug for PageGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageGuard")
            .field("url", &self.url)
            .field("open", &self.page.is_some())
            .finish()
    }
}

impl PageGuard {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Takes a snapshot of the rendered document.
    pub async fn content(&self) -> Result<String, NavigationError> {
        let page = self.page.as_ref().ok_or_else(|| NavigationError::Snapshot {
            url: self.url.clone(),
            reason: "page already closed".to_string(),
        })?;

        page.content()
            .await
            .map_err(|e| NavigationError::Snapshot { url: self.url.clone(), reason: format!("{:#}", e) })
    }

    /// Closes the page context. Errors are logged, never returned.
    pub async fn close(mut self) {
        if let Some(mut page) = self.page.take() {
            close_quietly(page.as_mut(), &self.url).await;
        }
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        let Some(mut page) = self.page.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let url = std::mem::take(&mut self.url);
                handle.spawn(async move {
                    close_quietly(page.as_mut(), &url).await;
                });
            }
            Err(_) => warn!("Page for {} dropped outside a runtime; not closed", self.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::mock::MockBrowser;

    const LISTING: &str = "https://www.amazon.com.br/bestsellers";

    fn browser_with(url: &str, html: &str) -> MockBrowser {
        MockBrowser::new([(url.to_string(), html.to_string())])
    }

    #[tokio::test]
    async fn test_open_ready_page() {
        let browser = browser_with(LISTING, r#"<div data-asin="B01">x</div>"#);
        let navigator = PageNavigator::new(&browser, NavigationOptions::default());

        let guard = navigator.open(LISTING, "[data-asin]").await.unwrap();
        assert_eq!(guard.url(), LISTING);
        assert!(guard.content().await.unwrap().contains("B01"));

        guard.close().await;
        assert_eq!(browser.opened(), 1);
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_closes_page() {
        let browser = MockBrowser::default();
        let navigator = PageNavigator::new(&browser, NavigationOptions::default());

        let err = navigator.open("https://unreachable.test/dp/B01", "#dp").await.unwrap_err();
        assert!(matches!(err, NavigationError::Navigate { .. }));
        assert_eq!(err.url(), Some("https://unreachable.test/dp/B01"));
        assert_eq!(browser.opened(), 1);
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_readiness_failure_closes_page() {
        let browser = browser_with(LISTING, "<html><body>empty</body></html>");
        let navigator = PageNavigator::new(&browser, NavigationOptions::default());

        let err = navigator.open(LISTING, "[data-asin]").await.unwrap_err();
        match err {
            NavigationError::NotReady { selector, .. } => assert_eq!(selector, "[data-asin]"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_block_page_detected() {
        let browser = browser_with(
            LISTING,
            r#"<html><body><form action="/errors/validateCaptcha">CAPTCHA</form></body></html>"#,
        );
        let navigator = PageNavigator::new(&browser, NavigationOptions::default());

        let err = navigator.open(LISTING, "[data-asin]").await.unwrap_err();
        assert!(matches!(err, NavigationError::Blocked { reason: "CAPTCHA challenge", .. }));
        assert_eq!(browser.closed(), 1);
    }

    #[tokio::test]
    async fn test_page_context_failure() {
        let browser = MockBrowser::broken();
        let navigator = PageNavigator::new(&browser, NavigationOptions::default());

        let err = navigator.open(LISTING, "[data-asin]").await.unwrap_err();
        assert!(matches!(err, NavigationError::PageContext { .. }));
        assert!(err.to_string().contains("Simulated browser crash"));
    }

    #[tokio::test]
    async fn test_dropped_guard_still_closes() {
        let browser = browser_with(LISTING, r#"<div data-asin="B01"></div>"#);
        let navigator = PageNavigator::new(&browser, NavigationOptions::default());

        let guard = navigator.open(LISTING, "[data-asin]").await.unwrap();
        drop(guard);

        for _ in 0..10 {
            if browser.closed() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(browser.closed(), 1);
    }

    #[test]
    fn test_block_reason() {
        assert_eq!(block_reason(r#"<img src="/captcha/abc.jpg">"#), Some("CAPTCHA challenge"));
        assert_eq!(
            block_reason(r#"<img alt="Sorry, meet the dogs of Amazon" src="/503.jpg">"#),
            Some("service unavailable page")
        );
        assert_eq!(block_reason(r#"<div id="dp"></div>"#), None);
    }
}
