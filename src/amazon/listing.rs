//! Bestseller listing extraction: section scoping, card selection and
//! per-field fallback chains.

use crate::amazon::models::Product;
use crate::amazon::regions::Region;
use crate::amazon::selectors::listing;
use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

/// One way of reading a card's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceStrategy {
    /// A single node holding the whole display price.
    Inline,
    /// Symbol, integer and fraction nodes found directly in the card.
    Parts,
    /// Symbol, integer and fraction nodes inside a generic price container.
    Container,
}

impl PriceStrategy {
    /// Default precedence: most specific markup first.
    pub fn default_order() -> Vec<PriceStrategy> {
        vec![PriceStrategy::Inline, PriceStrategy::Parts, PriceStrategy::Container]
    }
}

/// Extracts the top-N products of a bestseller listing.
pub struct ListingScanner {
    base_url: Url,
    currency_symbol: String,
    decimal_separator: char,
    price_strategies: Vec<PriceStrategy>,
}

impl ListingScanner {
    /// Creates a scanner resolving relative links against `base_url`.
    pub fn new(base_url: &str, region: Region) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;

        Ok(Self {
            base_url,
            currency_symbol: region.currency_symbol().to_string(),
            decimal_separator: region.decimal_separator(),
            price_strategies: PriceStrategy::default_order(),
        })
    }

    /// Replaces the price strategy precedence.
    pub fn with_price_strategies(mut self, strategies: Vec<PriceStrategy>) -> Self {
        self.price_strategies = strategies;
        self
    }

    /// Returns at most `limit` products, in document order, from the section
    /// introduced by a heading containing `section_heading`.
    pub fn extract_top(&self, html: &str, limit: usize, section_heading: &str) -> Vec<Product> {
        let document = Html::parse_document(html);
        let scope = resolve_scope(&document, section_heading);

        let cards: Vec<ElementRef> = scope
            .select(&listing::CARD)
            .filter(|card| {
                card.value().attr(listing::ITEM_ATTR).is_some_and(|id| !id.trim().is_empty())
            })
            .collect();

        debug!("Found {} cards in scope, taking up to {}", cards.len(), limit);

        cards
            .into_iter()
            .take(limit)
            .map(|card| {
                let product = self.extract_card(card);
                trace!("Extracted card: {} - {}", product.title, product.price);
                product
            })
            .collect()
    }

    /// Extracts one card; every field falls back to an empty string on its own.
    fn extract_card(&self, card: ElementRef) -> Product {
        Product::new(
            extract_title(card).unwrap_or_default(),
            self.extract_price(card).unwrap_or_default(),
            self.extract_url(card).unwrap_or_default(),
        )
    }

    fn extract_price(&self, card: ElementRef) -> Option<String> {
        self.price_strategies.iter().find_map(|strategy| match strategy {
            PriceStrategy::Inline => inline_price(card),
            PriceStrategy::Parts => self.split_price(
                card,
                &listing::PRICE_SYMBOL,
                &listing::PRICE_WHOLE,
                &listing::PRICE_FRACTION,
            ),
            PriceStrategy::Container => card.select(&listing::PRICE_CONTAINER).find_map(|container| {
                self.split_price(
                    container,
                    &listing::PRICE_CONTAINER_SYMBOL,
                    &listing::PRICE_CONTAINER_WHOLE,
                    &listing::PRICE_CONTAINER_FRACTION,
                )
            }),
        })
    }

    /// Rebuilds a price from its symbol, integer and fraction nodes.
    fn split_price(
        &self,
        scope: ElementRef,
        symbol: &Selector,
        whole: &Selector,
        fraction: &Selector,
    ) -> Option<String> {
        let whole = first_raw_text(scope, whole).map(|t| digits(&t)).unwrap_or_default();
        if whole.is_empty() {
            return None;
        }

        let symbol = first_raw_text(scope, symbol)
            .map(|t| normalize_text(&t))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.currency_symbol.clone());
        let fraction = first_raw_text(scope, fraction).map(|t| digits(&t)).unwrap_or_default();

        Some(compose_price(&symbol, &whole, &fraction, self.decimal_separator))
    }

    fn extract_url(&self, card: ElementRef) -> Option<String> {
        let href = card
            .select(&listing::DETAIL_LINK)
            .chain(card.select(&listing::ANY_LINK))
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())?;

        Some(self.resolve_url(href))
    }

    /// Resolves a card link: absolute hrefs pass through, relative ones are
    /// joined to the base origin.
    pub fn resolve_url(&self, href: &str) -> String {
        if Url::parse(href).is_ok() {
            return href.to_string();
        }

        match self.base_url.join(href) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base_url.as_str().trim_end_matches('/'), href),
        }
    }
}

/// Finds the element to search cards in. Falls back to the whole document
/// when no heading matches.
fn resolve_scope<'a>(document: &'a Html, section_heading: &str) -> ElementRef<'a> {
    let root = document.root_element();
    let needle = normalize_text(section_heading);
    if needle.is_empty() {
        return root;
    }

    let Some(heading) = document
        .select(&listing::HEADING)
        .find(|h| normalize_text(&h.text().collect::<String>()).contains(&needle))
    else {
        debug!("No heading contains '{}', scanning the whole page", needle);
        return root;
    };

    let section = heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| listing::SECTION.matches(element));

    match section {
        Some(section) => {
            debug!("Scoped to <{}> enclosing heading '{}'", section.value().name(), needle);
            section
        }
        None => {
            debug!("No section encloses heading '{}', using its parent", needle);
            heading.parent().and_then(ElementRef::wrap).unwrap_or(heading)
        }
    }
}

/// Primary title class, then secondary text class, then image alt text.
fn extract_title(card: ElementRef) -> Option<String> {
    first_text(card, &listing::TITLE_PRIMARY)
        .or_else(|| first_text(card, &listing::TITLE_SECONDARY))
        .or_else(|| {
            card.select(&listing::IMAGE_ALT)
                .filter_map(|img| img.value().attr("alt"))
                .map(str::trim)
                .find(|alt| !alt.is_empty())
                .map(String::from)
        })
}

/// Inline price node; only accepted when it carries a digit.
fn inline_price(card: ElementRef) -> Option<String> {
    first_text(card, &listing::PRICE_INLINE).filter(|text| text.chars().any(|c| c.is_ascii_digit()))
}

/// First non-empty, whitespace-collapsed text among the selector's matches.
fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .map(|e| normalize_text(&e.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

fn first_raw_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(|e| e.text().collect())
}

fn digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Collapses runs of whitespace (including non-breaking spaces) and trims.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Composes `"<symbol> <whole>[<sep><fraction>]"`.
pub fn compose_price(symbol: &str, whole: &str, fraction: &str, separator: char) -> String {
    if fraction.is_empty() {
        format!("{} {}", symbol, whole)
    } else {
        format!("{} {}{}{}", symbol, whole, separator, fraction)
    }
}
