//! Headless Chromium page engine (feature `chromium`).

use super::{BrowserSession, NetworkIdleTracker, PageContext, WaitUntil};
use crate::config::Config;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::Page;
use futures::stream::{self, Stream, StreamExt};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, trace, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Request lifecycle as reported by the CDP network domain.
enum NetworkEvent {
    Started(String),
    Finished(String),
}

/// A running Chromium instance.
pub struct ChromiumBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumBrowser {
    /// Launches Chromium with the given configuration.
    pub async fn launch(config: &Config) -> Result<Self> {
        let navigation_timeout = Duration::from_millis(config.navigation_timeout_ms);

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .request_timeout(navigation_timeout);

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(proxy) = &config.proxy {
            debug!("Configuring proxy: {}", proxy);
            builder = builder.arg(format!("--proxy-server={}", proxy));
        }

        let browser_config =
            builder.build().map_err(|e| anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) =
            Browser::launch(browser_config).await.context("Failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!("Chromium handler event error: {}", e);
                }
            }
        });

        info!("Chromium launched (headless: {})", config.headless);
        Ok(Self { browser, handler, navigation_timeout })
    }

    /// Shuts the browser down.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("Failed to close Chromium")?;
        match self.browser.wait().await {
            Ok(status) => debug!("Chromium exited: {:?}", status),
            Err(e) => warn!("Failed to wait for Chromium to exit: {}", e),
        }
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ChromiumBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageContext>> {
        let page = self.browser.new_page("about:blank").await.context("Failed to create page")?;
        Ok(Box::new(ChromiumPage {
            page: Some(page),
            navigation_timeout: self.navigation_timeout,
        }))
    }
}

/// A Chromium tab.
pub struct ChromiumPage {
    page: Option<Page>,
    navigation_timeout: Duration,
}

impl ChromiumPage {
    fn page(&self) -> Result<&Page> {
        self.page.as_ref().context("Page already closed")
    }

    /// Subscribes to request start and end events. Must precede `goto`.
    async fn network_events(page: &Page) -> Result<impl Stream<Item = NetworkEvent> + Unpin + Send> {
        let started = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .context("Failed to listen for network requests")?
            .map(|e| NetworkEvent::Started(e.request_id.inner().clone()));
        let finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .context("Failed to listen for network responses")?
            .map(|e| NetworkEvent::Finished(e.request_id.inner().clone()));
        let failed = page
            .event_listener::<EventLoadingFailed>()
            .await
            .context("Failed to listen for network failures")?
            .map(|e| NetworkEvent::Finished(e.request_id.inner().clone()));

        Ok(stream::select(started, stream::select(finished, failed)))
    }

    /// Waits until at most `max_inflight` requests stay pending for `quiet`.
    async fn wait_for_network_idle(
        &self,
        events: &mut (impl Stream<Item = NetworkEvent> + Unpin + Send),
        max_inflight: usize,
        quiet: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + self.navigation_timeout;
        let mut tracker = NetworkIdleTracker::new(max_inflight, quiet, Instant::now());

        loop {
            let now = Instant::now();
            if tracker.is_idle(now) {
                return Ok(());
            }
            if now >= deadline {
                bail!(
                    "Network never went idle within {:?} ({} requests pending)",
                    self.navigation_timeout,
                    tracker.inflight()
                );
            }

            match timeout(POLL_INTERVAL.min(quiet), events.next()).await {
                Ok(Some(NetworkEvent::Started(id))) => tracker.request_started(id, Instant::now()),
                Ok(Some(NetworkEvent::Finished(id))) => tracker.request_finished(&id, Instant::now()),
                Ok(None) => bail!("Page went away while waiting for network idle"),
                Err(_) => {}
            }
        }
    }
}

#[async_trait]
impl PageContext for ChromiumPage {
    async fn goto(&mut self, url: &str, wait_until: WaitUntil) -> Result<()> {
        let page = self.page()?;
        debug!("Navigating to {}", url);

        let mut events = Self::network_events(page).await?;

        page.goto(url).await.with_context(|| format!("Failed to navigate to {}", url))?;
        page.wait_for_navigation().await.context("Navigation did not complete")?;

        if let WaitUntil::NetworkIdle { max_inflight, quiet } = wait_until {
            self.wait_for_network_idle(&mut events, max_inflight, quiet).await?;
        }
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;

        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("Timed out after {:?} waiting for selector '{}'", timeout, selector);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn content(&self) -> Result<String> {
        self.page()?.content().await.context("Failed to get page content")
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            page.close().await.context("Failed to close page")?;
        }
        Ok(())
    }
}
