//! The extraction run: listing scan, then sequential detail enrichment.

pub mod enricher;
pub mod navigator;

pub use enricher::DetailEnricher;
pub use navigator::{NavigationOptions, PageGuard, PageNavigator};

use crate::amazon::detail::DetailExtractor;
use crate::amazon::listing::ListingScanner;
use crate::amazon::models::Product;
use crate::browser::BrowserSession;
use crate::config::Config;
use anyhow::{bail, Result};
use std::fmt;
use tracing::{debug, info};

/// Where a pipeline is in its single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Listing,
    Enriching,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Listing => "listing",
            PipelineState::Enriching => "enriching",
            PipelineState::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Everything a run needs, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub listing_url: String,
    pub section_heading: String,
    pub limit: usize,
    pub listing_ready_selector: String,
    pub navigation: NavigationOptions,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            listing_url: config.listing_url(),
            section_heading: config.section_heading(),
            limit: config.limit,
            listing_ready_selector: config.listing_ready_selector.clone(),
            navigation: NavigationOptions::from_config(config),
        }
    }
}

/// Runs one listing extraction against a browser session.
pub struct Pipeline<'a> {
    session: &'a dyn BrowserSession,
    config: PipelineConfig,
    scanner: ListingScanner,
    enricher: DetailEnricher,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    /// Builds a pipeline from application config.
    pub fn new(session: &'a dyn BrowserSession, config: &Config) -> Result<Self> {
        let scanner = ListingScanner::new(&config.base_url(), config.region)?
            .with_price_strategies(config.price_strategies.clone());

        let enricher = DetailEnricher::new(
            DetailExtractor::for_region(config.region),
            config.detail_ready_selector.clone(),
            NavigationOptions::from_config(config),
        );

        Ok(Self::with_parts(session, PipelineConfig::from_config(config), scanner, enricher))
    }

    /// Builds a pipeline from already configured components.
    pub fn with_parts(
        session: &'a dyn BrowserSession,
        config: PipelineConfig,
        scanner: ListingScanner,
        enricher: DetailEnricher,
    ) -> Self {
        Self { session, config, scanner, enricher, state: PipelineState::Idle }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Extracts the top products and enriches each one, in listing order.
    ///
    /// Only a listing page that cannot be opened fails the run; the error
    /// wraps a [`NavigationError`](crate::error::NavigationError).
    pub async fn run(&mut self) -> Result<Vec<Product>> {
        if self.state != PipelineState::Idle {
            bail!("Pipeline already ran (state: {})", self.state);
        }

        self.state = PipelineState::Listing;
        info!("Loading listing {}", self.config.listing_url);

        let navigator = PageNavigator::new(self.session, self.config.navigation);
        let page = navigator.open(&self.config.listing_url, &self.config.listing_ready_selector).await?;

        // Listing page is released before any detail page opens
        let snapshot = page.content().await;
        page.close().await;
        let html = snapshot?;

        let products = self.scanner.extract_top(&html, self.config.limit, &self.config.section_heading);
        info!("Found {} products (limit {})", products.len(), self.config.limit);

        self.state = PipelineState::Enriching;
        let total = products.len();
        let mut enriched = Vec::with_capacity(total);

        for (i, product) in products.into_iter().enumerate() {
            debug!("Enriching {}/{}: {}", i + 1, total, product.url);
            enriched.push(self.enricher.enrich(self.session, product).await);
        }

        self.state = PipelineState::Done;
        info!(
            "Enriched {}/{} products",
            enriched.iter().filter(|p| p.is_enriched()).count(),
            total
        );

        Ok(enriched)
    }
}
