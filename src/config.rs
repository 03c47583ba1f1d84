//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::amazon::listing::PriceStrategy;
use crate::amazon::regions::Region;
use crate::amazon::selectors::{DETAIL_READY, LISTING_READY};
use crate::browser::WaitUntil;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Amazon region
    #[serde(default)]
    pub region: Region,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Number of top listing items to extract
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Heading text that identifies the target listing section
    #[serde(default)]
    pub section_heading: Option<String>,

    /// Listing page URL (defaults to the region's bestsellers page)
    #[serde(default)]
    pub listing_url: Option<String>,

    /// Origin relative product links are resolved against
    #[serde(default)]
    pub base_url: Option<String>,

    /// Page engine
    #[serde(default)]
    pub engine: Engine,

    /// Run Chromium without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Navigation timeout in milliseconds
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// How long to wait for a readiness selector, in milliseconds
    #[serde(default = "default_readiness_timeout_ms")]
    pub readiness_timeout_ms: u64,

    /// Quiet window that counts as network idle, in milliseconds
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Connections tolerated during the quiet window
    #[serde(default = "default_network_idle_max_inflight")]
    pub network_idle_max_inflight: usize,

    /// Readiness selector for the listing page
    #[serde(default = "default_listing_ready_selector")]
    pub listing_ready_selector: String,

    /// Readiness selector for product detail pages
    #[serde(default = "default_detail_ready_selector")]
    pub detail_ready_selector: String,

    /// Price extraction strategies, tried in order
    #[serde(default = "PriceStrategy::default_order")]
    pub price_strategies: Vec<PriceStrategy>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Directory for timestamped JSON/CSV exports
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_limit() -> usize {
    3
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_readiness_timeout_ms() -> u64 {
    10_000
}

fn default_network_idle_ms() -> u64 {
    500
}

fn default_network_idle_max_inflight() -> usize {
    2
}

fn default_listing_ready_selector() -> String {
    LISTING_READY.to_string()
}

fn default_detail_ready_selector() -> String {
    DETAIL_READY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: Region::Br,
            proxy: None,
            limit: default_limit(),
            section_heading: None,
            listing_url: None,
            base_url: None,
            engine: Engine::Http,
            headless: default_headless(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            readiness_timeout_ms: default_readiness_timeout_ms(),
            network_idle_ms: default_network_idle_ms(),
            network_idle_max_inflight: default_network_idle_max_inflight(),
            listing_ready_selector: default_listing_ready_selector(),
            detail_ready_selector: default_detail_ready_selector(),
            price_strategies: PriceStrategy::default_order(),
            format: OutputFormat::Table,
            output_dir: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-bestsellers").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(region) = std::env::var("AMZ_REGION") {
            if let Ok(r) = region.parse() {
                self.region = r;
            }
        }

        if let Ok(proxy) = std::env::var("AMZ_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(limit) = std::env::var("AMZ_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.limit = l;
            }
        }

        if let Ok(engine) = std::env::var("AMZ_ENGINE") {
            if let Ok(e) = engine.parse() {
                self.engine = e;
            }
        }

        self
    }

    /// Wait condition for page navigations.
    pub fn wait_until(&self) -> WaitUntil {
        WaitUntil::NetworkIdle {
            max_inflight: self.network_idle_max_inflight,
            quiet: Duration::from_millis(self.network_idle_ms),
        }
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }

    /// Listing page to open: explicit URL or the region's bestsellers page.
    pub fn listing_url(&self) -> String {
        self.listing_url.clone().unwrap_or_else(|| self.region.bestsellers_url())
    }

    /// Origin used to resolve relative product links.
    pub fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.region.base_url())
    }

    /// Section heading to scope the listing scan to.
    pub fn section_heading(&self) -> String {
        self.section_heading
            .clone()
            .unwrap_or_else(|| self.region.bestsellers_heading().to_string())
    }
}

/// Page engine used to render pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Browser-impersonating HTTP client, no script execution
    #[default]
    Http,
    /// Headless Chromium (requires the `chromium` feature)
    Chromium,
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Engine::Http),
            "chromium" | "chrome" => Ok(Engine::Chromium),
            _ => Err(format!("Unknown engine: {}. Use: http, chromium", s)),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Http => write!(f, "http"),
            Engine::Chromium => write!(f, "chromium"),
        }
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
