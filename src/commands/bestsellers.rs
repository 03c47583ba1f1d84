//! Bestseller extraction command implementation.

use crate::browser::{BrowserSession, HttpBrowser};
use crate::config::{Config, Engine};
use crate::export;
use crate::format::Formatter;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use tracing::info;

/// Extracts and enriches the top bestsellers.
pub struct BestsellersCommand {
    config: Config,
}

impl BestsellersCommand {
    /// Creates a new bestsellers command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the extraction on the configured engine and returns formatted output.
    pub async fn execute(&self) -> Result<String> {
        info!("Using {} page engine", self.config.engine);

        match self.config.engine {
            Engine::Http => {
                let browser =
                    HttpBrowser::new(&self.config).context("Failed to create HTTP page engine")?;
                self.execute_with_session(&browser).await
            }
            Engine::Chromium => self.execute_chromium().await,
        }
    }

    #[cfg(feature = "chromium")]
    async fn execute_chromium(&self) -> Result<String> {
        let browser = crate::browser::ChromiumBrowser::launch(&self.config).await?;
        let output = self.execute_with_session(&browser).await;

        if let Err(e) = browser.close().await {
            tracing::warn!("{:#}", e);
        }
        output
    }

    #[cfg(not(feature = "chromium"))]
    async fn execute_chromium(&self) -> Result<String> {
        anyhow::bail!("The chromium engine is not available. Rebuild with `--features chromium`.")
    }

    /// Runs the extraction with a provided session (for testing).
    pub async fn execute_with_session(&self, session: &dyn BrowserSession) -> Result<String> {
        let mut pipeline = Pipeline::new(session, &self.config)?;
        let products = pipeline.run().await.context("Failed to load the bestseller listing")?;

        if let Some(dir) = &self.config.output_dir {
            let json = export::write_json(dir, &products)?;
            let csv = export::write_csv(dir, &products)?;
            eprintln!("Saved {}", json.display());
            eprintln!("Saved {}", csv.display());
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_products(&products))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::Product;
    use crate::browser::mock::MockBrowser;
    use crate::config::OutputFormat;
    use crate::error::NavigationError;

    const LISTING: &str = "https://www.amazon.com.br/bestsellers";

    const LISTING_HTML: &str = r#"<html><body><section>
        <h2>Mais vendidos</h2>
        <div data-asin="B01">
            <img alt="Cafeteira Elétrica">
            <a href="/dp/B01"><span class="a-price"><span class="a-price-symbol">R$</span><span class="a-price-whole">129<span class="a-price-decimal">,</span></span><span class="a-price-fraction">90</span></span></a>
        </div>
    </section></body></html>"#;

    const DETAIL_HTML: &str = r#"<html><body><div id="dp">
        <span id="best-offer-string-cc" class="best-offer-name">em até 3x</span>
    </div></body></html>"#;

    fn make_test_config(format: OutputFormat) -> Config {
        Config { listing_url: Some(LISTING.to_string()), format, ..Config::default() }
    }

    fn make_browser() -> MockBrowser {
        MockBrowser::new([
            (LISTING.to_string(), LISTING_HTML.to_string()),
            ("https://www.amazon.com.br/dp/B01".to_string(), DETAIL_HTML.to_string()),
        ])
    }

    #[tokio::test]
    async fn test_execute_json_output() {
        let cmd = BestsellersCommand::new(make_test_config(OutputFormat::Json));
        let output = cmd.execute_with_session(&make_browser()).await.unwrap();

        let products: Vec<Product> = serde_json::from_str(&output).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Cafeteira Elétrica");
        assert_eq!(products[0].price, "R$ 129,90");
        assert_eq!(products[0].url, "https://www.amazon.com.br/dp/B01");
        assert_eq!(products[0].payment_conditions.as_deref(), Some("em até 3x"));
    }

    #[tokio::test]
    async fn test_execute_table_output() {
        let cmd = BestsellersCommand::new(make_test_config(OutputFormat::Table));
        let output = cmd.execute_with_session(&make_browser()).await.unwrap();

        assert!(output.contains("Cafeteira Elétrica"));
        assert!(output.contains("Total: 1 products (1 enriched)"));
    }

    #[tokio::test]
    async fn test_execute_writes_exports() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: Some(dir.path().to_path_buf()),
            ..make_test_config(OutputFormat::Csv)
        };

        let cmd = BestsellersCommand::new(config);
        cmd.execute_with_session(&make_browser()).await.unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("products_") && names[0].ends_with(".csv"));
        assert!(names[1].starts_with("products_") && names[1].ends_with(".json"));
    }

    #[tokio::test]
    async fn test_execute_listing_failure() {
        let cmd = BestsellersCommand::new(make_test_config(OutputFormat::Table));
        let err = cmd.execute_with_session(&MockBrowser::default()).await.unwrap_err();

        assert!(err.to_string().contains("Failed to load the bestseller listing"));
        assert!(err.downcast_ref::<NavigationError>().is_some());
    }

    #[cfg(not(feature = "chromium"))]
    #[tokio::test]
    async fn test_chromium_engine_requires_feature() {
        let config = Config { engine: Engine::Chromium, ..Config::default() };
        let err = BestsellersCommand::new(config).execute().await.unwrap_err();
        assert!(err.to_string().contains("--features chromium"));
    }
}
