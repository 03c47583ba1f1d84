//! Timestamped JSON and CSV export files.

use crate::amazon::Product;
use crate::format::{csv_row, CSV_HEADER};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File stamp: UTC time with the colons replaced, e.g. `2026-10-19T14-03-07`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Writes `products_<timestamp>.json` into `dir` and returns its path.
pub fn write_json(dir: &Path, products: &[Product]) -> Result<PathBuf> {
    let path = export_path(dir, "json")?;
    let json = serde_json::to_string_pretty(products).context("Failed to serialize products")?;

    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} products to {}", products.len(), path.display());
    Ok(path)
}

/// Writes `products_<timestamp>.csv` into `dir` and returns its path.
pub fn write_csv(dir: &Path, products: &[Product]) -> Result<PathBuf> {
    let path = export_path(dir, "csv")?;

    let mut content = String::from(CSV_HEADER);
    content.push('\n');
    for product in products {
        content.push_str(&csv_row(product));
        content.push('\n');
    }

    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} products to {}", products.len(), path.display());
    Ok(path)
}

fn export_path(dir: &Path, extension: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    Ok(dir.join(format!("products_{}.{}", timestamp(Utc::now()), extension)))
}
