//! CLI command implementations.

pub mod bestsellers;

pub use bestsellers::BestsellersCommand;
