//! Default page engine: wreq with Chrome TLS fingerprint emulation.
//!
//! Each page context performs a document request and serves the response
//! body as its rendered snapshot. There is no script execution, so the
//! network is quiescent as soon as the body has been read.

use super::{document_matches, BrowserSession, PageContext, WaitUntil};
use crate::amazon::regions::Region;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, trace, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Browser-impersonating HTTP session.
pub struct HttpBrowser {
    client: Client,
    region: Region,
}

impl HttpBrowser {
    /// Creates a session with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_millis(config.navigation_timeout_ms))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, region: config.region })
    }
}

#[async_trait]
impl BrowserSession for HttpBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageContext>> {
        Ok(Box::new(HttpPage {
            client: self.client.clone(),
            region: self.region,
            url: None,
            body: None,
            closed: false,
        }))
    }
}

/// A page context backed by a single document request.
pub struct HttpPage {
    client: Client,
    region: Region,
    url: Option<String>,
    body: Option<String>,
    closed: bool,
}

impl HttpPage {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            bail!("Page already closed");
        }
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", self.region.accept_language())
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Service unavailable (503) for {}", url);
            bail!("Service unavailable (503)");
        }

        if !status.is_success() {
            bail!("Request failed with status: {}", status);
        }

        let final_url = response.uri().to_string();
        if final_url != url {
            debug!("Redirected to {}", final_url);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl PageContext for HttpPage {
    async fn goto(&mut self, url: &str, wait_until: WaitUntil) -> Result<()> {
        self.ensure_open()?;
        self.body = None;

        let body = self.fetch(url).await?;
        trace!("{:?} satisfied once the body is read ({} bytes)", wait_until, body.len());

        self.url = Some(url.to_string());
        self.body = Some(body);
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        let body = self.body.as_deref().context("No document loaded")?;

        // Static documents never change, so a single check is final
        if document_matches(body, selector)? {
            Ok(())
        } else {
            bail!("Selector '{}' not present in the document", selector)
        }
    }

    async fn content(&self) -> Result<String> {
        self.ensure_open()?;
        self.body.clone().context("No document loaded")
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            trace!("Closing page {}", self.url.as_deref().unwrap_or("about:blank"));
            self.closed = true;
            self.body = None;
        }
        Ok(())
    }
}
