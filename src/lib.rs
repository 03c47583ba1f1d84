//! amz-bestsellers - Top-N Amazon bestseller extraction with detail enrichment
//!
//! Scans a bestseller listing for its top products, then visits each product's
//! detail page for payment conditions and spec-table attributes.

pub mod amazon;
pub mod browser;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod pipeline;

pub use amazon::models::{Product, ProductSpecs, SpecField};
pub use amazon::regions::Region;
pub use config::Config;
pub use error::NavigationError;
pub use pipeline::{Pipeline, PipelineState};
