//! In-memory page engine for tests: URLs map to canned HTML.

use super::{document_matches, BrowserSession, PageContext, WaitUntil};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock browser serving fixed pages; unknown URLs fail to navigate.
#[derive(Default)]
pub struct MockBrowser {
    pages: Arc<HashMap<String, String>>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub visited: Arc<Mutex<Vec<String>>>,
    fail_new_page: bool,
}

impl MockBrowser {
    pub fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self { pages: Arc::new(pages.into_iter().collect()), ..Self::default() }
    }

    /// A browser that cannot open any page context.
    pub fn broken() -> Self {
        Self { fail_new_page: true, ..Self::default() }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserSession for MockBrowser {
    async fn new_page(&self) -> Result<Box<dyn PageContext>> {
        if self.fail_new_page {
            bail!("Simulated browser crash");
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockPage {
            pages: Arc::clone(&self.pages),
            closed: Arc::clone(&self.closed),
            visited: Arc::clone(&self.visited),
            current: None,
            is_closed: false,
        }))
    }
}

struct MockPage {
    pages: Arc<HashMap<String, String>>,
    closed: Arc<AtomicUsize>,
    visited: Arc<Mutex<Vec<String>>>,
    current: Option<String>,
    is_closed: bool,
}

#[async_trait]
impl PageContext for MockPage {
    async fn goto(&mut self, url: &str, _wait_until: WaitUntil) -> Result<()> {
        if self.is_closed {
            bail!("Page already closed");
        }

        self.visited.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => {
                self.current = Some(html.clone());
                Ok(())
            }
            None => bail!("net::ERR_NAME_NOT_RESOLVED at {}", url),
        }
    }

    async fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<()> {
        let html = self.current.as_deref().context("No document loaded")?;
        if document_matches(html, selector)? {
            Ok(())
        } else {
            bail!("Timed out waiting for selector '{}'", selector)
        }
    }

    async fn content(&self) -> Result<String> {
        self.current.clone().context("No document loaded")
    }

    async fn close(&mut self) -> Result<()> {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
