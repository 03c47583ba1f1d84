//! CSS selectors for Amazon bestseller and product pages.
//!
//! This file contains all CSS selectors used for extraction. Update it when
//! Amazon changes their HTML structure.
//!
//! **Update process**: When extraction degrades, capture an HTML sample,
//! update selectors, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Default readiness marker for the bestseller listing.
pub const LISTING_READY: &str = "[data-asin]";

/// Default readiness marker for a product detail page.
pub const DETAIL_READY: &str = "#dp, #dp-container, #productTitle";

/// Selectors for the bestseller listing page.
pub mod listing {
    use super::*;

    /// Section headings searched for the target grid title.
    pub static HEADING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

    /// Structural containers that scope a heading's grid.
    pub static SECTION: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "section, \
             [role='region'], \
             .a-carousel-container, \
             .p13n-desktop-grid, \
             #zg-right-col",
        )
        .unwrap()
    });

    /// Per-item identifier attribute on listing cards.
    pub static ITEM_ATTR: &str = "data-asin";

    /// Listing cards.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[data-asin]").unwrap());

    /// Primary title class.
    pub static TITLE_PRIMARY: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "div.p13n-sc-truncate-desktop-type2, \
             div._cDEzb_p13n-sc-css-line-clamp-3_g3dy1, \
             div.p13n-sc-truncated",
        )
        .unwrap()
    });

    /// Secondary text style used by newer card layouts.
    pub static TITLE_SECONDARY: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "a.a-link-normal span.a-size-base, \
             span.a-size-small.a-color-base, \
             .a-size-base-plus.a-color-base",
        )
        .unwrap()
    });

    /// Card image, for the alt-text title fallback.
    pub static IMAGE_ALT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img[alt]").unwrap());

    /// Single inline price node.
    pub static PRICE_INLINE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "span._cDEzb_p13n-sc-price_3mJ9Z, \
             span.p13n-sc-price",
        )
        .unwrap()
    });

    /// Currency symbol part of a split price.
    pub static PRICE_SYMBOL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".a-price .a-price-symbol, .a-price-symbol").unwrap());

    /// Integer part of a split price.
    pub static PRICE_WHOLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".a-price .a-price-whole, .a-price-whole").unwrap());

    /// Fractional part of a split price.
    pub static PRICE_FRACTION: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(".a-price .a-price-fraction, .a-price-fraction").unwrap()
    });

    /// Generic price containers tried when the specific classes are missing.
    pub static PRICE_CONTAINER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[class*='price']").unwrap());

    /// Generic symbol part inside a price container.
    pub static PRICE_CONTAINER_SYMBOL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[class*='symbol']").unwrap());

    /// Generic integer part inside a price container.
    pub static PRICE_CONTAINER_WHOLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[class*='whole']").unwrap());

    /// Generic fractional part inside a price container.
    pub static PRICE_CONTAINER_FRACTION: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("[class*='fraction']").unwrap());

    /// Link to the product detail page.
    pub static DETAIL_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a[href*='/dp/']").unwrap());

    /// Any link, when no detail link is present.
    pub static ANY_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a[href]").unwrap());
}

/// Selectors for product detail pages.
pub mod detail {
    use super::*;

    /// Installment / payment conditions text.
    pub static PAYMENT_CONDITIONS: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("#best-offer-string-cc.best-offer-name").unwrap());

    /// Spec table rows (product overview and technical details tables).
    pub static SPEC_ROW: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "tr.a-spacing-small, \
             table.prodDetTable tr",
        )
        .unwrap()
    });

    /// Label cell inside a spec row.
    pub static SPEC_LABEL: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "td.a-span3 span.a-size-base.a-text-bold, \
             th.prodDetSectionEntry",
        )
        .unwrap()
    });

    /// Value cell inside a spec row.
    pub static SPEC_VALUE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "td.a-span9 span.a-size-base.po-break-word, \
             td.prodDetAttrValue",
        )
        .unwrap()
    });
}

/// Selectors for pages served instead of the requested one.
pub mod errors {
    use super::*;

    /// CAPTCHA challenge.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (Amazon's 503 error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='dog'], \
             .a-box-inner a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}
