//! Amazon-specific extraction: selectors, listing and detail parsing, models.

pub mod detail;
pub mod listing;
pub mod models;
pub mod regions;
pub mod selectors;

pub use detail::DetailExtractor;
pub use listing::{ListingScanner, PriceStrategy};
pub use models::{Product, ProductDetails, ProductSpecs, SpecField};
pub use regions::Region;
