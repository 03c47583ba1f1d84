//! Per-product detail enrichment.

use super::navigator::{NavigationOptions, PageNavigator};
use crate::amazon::detail::DetailExtractor;
use crate::amazon::models::{Product, ProductDetails};
use crate::browser::BrowserSession;
use crate::error::NavigationError;
use tracing::{debug, warn};

/// Visits a product's detail page and merges what it finds.
pub struct DetailEnricher {
    extractor: DetailExtractor,
    ready_selector: String,
    options: NavigationOptions,
}

impl DetailEnricher {
    pub fn new(
        extractor: DetailExtractor,
        ready_selector: impl Into<String>,
        options: NavigationOptions,
    ) -> Self {
        Self { extractor, ready_selector: ready_selector.into(), options }
    }

    /// Returns the product enriched from its detail page.
    ///
    /// Never fails: a product without a URL, or whose page cannot be opened,
    /// comes back unchanged.
    pub async fn enrich(&self, session: &dyn BrowserSession, product: Product) -> Product {
        if product.url.is_empty() {
            debug!("No detail URL for '{}', skipping enrichment", product.title);
            return product;
        }

        match self.fetch_details(session, &product.url).await {
            Ok(details) => {
                let mut enriched = product;
                enriched.merge_details(details);
                enriched
            }
            Err(e) => {
                warn!("Enrichment failed for {}: {}", product.url, e);
                product
            }
        }
    }

    async fn fetch_details(
        &self,
        session: &dyn BrowserSession,
        url: &str,
    ) -> Result<ProductDetails, NavigationError> {
        let navigator = PageNavigator::new(session, self.options);
        let page = navigator.open(url, &self.ready_selector).await?;

        let snapshot = page.content().await;
        page.close().await;

        Ok(self.extractor.extract(&snapshot?))
    }
}
