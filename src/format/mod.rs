//! Output formatting for products (table, JSON, markdown, CSV).

use crate::amazon::Product;
use crate::config::OutputFormat;

/// CSV columns, in export order.
pub const CSV_HEADER: &str =
    "title,price,paymentConditions,brand,color,material,capacity,dimensions,specialFeatures,url";

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => CSV_HEADER.to_string(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
        }
    }

    // JSON formatting

    fn json_products(&self, products: &[Product]) -> String {
        serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_products(&self, products: &[Product]) -> String {
        let rank_width = 3;
        let price_width = 14;
        let brand_width = 16;
        let title_width = 50;

        let mut lines = Vec::new();

        // Header
        lines.push(format!(
            "{:<rank_width$}  {:<price_width$}  {:<brand_width$}  {}",
            "#", "Price", "Brand", "Title"
        ));
        lines.push(format!(
            "{:-<rank_width$}  {:-<price_width$}  {:-<brand_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        // Rows
        for (i, product) in products.iter().enumerate() {
            let brand = product.specs.brand.as_deref().unwrap_or("");

            lines.push(format!(
                "{:<rank_width$}  {:>price_width$}  {:<brand_width$}  {}",
                i + 1,
                or_na(&product.price),
                truncate(brand, brand_width),
                truncate(&product.title, title_width)
            ));
        }

        let enriched = products.iter().filter(|p| p.is_enriched()).count();
        lines.push(String::new());
        lines.push(format!("Total: {} products ({} enriched)", products.len(), enriched));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| # | Price | Brand | Payment | Title |".to_string());
        lines.push("|---|-------|-------|---------|-------|".to_string());

        for (i, product) in products.iter().enumerate() {
            let title = truncate(&product.title, 40);
            let title = if product.url.is_empty() {
                title
            } else {
                format!("[{}]({})", title, product.url)
            };

            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                i + 1,
                or_na(&product.price),
                product.specs.brand.as_deref().unwrap_or(""),
                product.payment_conditions.as_deref().unwrap_or(""),
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::with_capacity(products.len() + 1);
        lines.push(CSV_HEADER.to_string());
        lines.extend(products.iter().map(csv_row));
        lines.join("\n")
    }
}

/// One CSV record for `product`, columns as in [`CSV_HEADER`].
pub fn csv_row(product: &Product) -> String {
    let specs = &product.specs;
    let columns = [
        product.title.as_str(),
        product.price.as_str(),
        product.payment_conditions.as_deref().unwrap_or(""),
        specs.brand.as_deref().unwrap_or(""),
        specs.color.as_deref().unwrap_or(""),
        specs.material.as_deref().unwrap_or(""),
        specs.capacity.as_deref().unwrap_or(""),
        specs.dimensions.as_deref().unwrap_or(""),
        specs.special_features.as_deref().unwrap_or(""),
        product.url.as_str(),
    ];

    columns.iter().map(|c| csv_escape(c)).collect::<Vec<_>>().join(",")
}

pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn or_na(s: &str) -> &str {
    if s.is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Shortens to `width` characters, ending in "..." when cut.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
