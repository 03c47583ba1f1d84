//! amz-bestsellers - Top-N Amazon bestseller extraction CLI
//!
//! Scans a bestseller listing and enriches each product from its detail page.

use amz_bestsellers::amazon::regions::Region;
use amz_bestsellers::commands::BestsellersCommand;
use amz_bestsellers::config::{Config, Engine, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-bestsellers",
    version,
    about = "Top-N Amazon bestseller extraction CLI",
    long_about = "Extracts the top products of an Amazon bestseller listing and enriches each one \
                  with payment conditions and spec-table attributes from its detail page."
)]
struct Cli {
    /// Amazon region [default: br]
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AMZ_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Page engine: http or chromium [default: http]
    #[arg(short, long, global = true)]
    engine: Option<Engine>,

    /// Show the Chromium window instead of running headless
    #[arg(long, global = true)]
    headed: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and enrich the top bestsellers
    #[command(alias = "b")]
    Bestsellers {
        /// Number of top products to extract [default: 3]
        #[arg(short, long)]
        limit: Option<usize>,

        /// Heading text of the listing section to scan
        #[arg(long)]
        heading: Option<String>,

        /// Listing URL (defaults to the region's bestsellers page)
        #[arg(short, long)]
        url: Option<String>,

        /// Directory for timestamped JSON and CSV exports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported regions
    Regions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if cli.headed {
        config.headless = false;
    }

    match cli.command {
        Commands::Bestsellers { limit, heading, url, output } => {
            if let Some(limit) = limit {
                config.limit = limit;
            }
            if heading.is_some() {
                config.section_heading = heading;
            }
            if url.is_some() {
                config.listing_url = url;
            }
            if output.is_some() {
                config.output_dir = output;
            }

            let cmd = BestsellersCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Regions => {
            println!("Supported Amazon regions:\n");
            println!("{:<6} {:<16} {:<10} {:<20}", "Code", "Domain", "Currency", "Listing heading");
            println!("{:-<6} {:-<16} {:-<10} {:-<20}", "", "", "", "");

            for region in Region::all() {
                println!(
                    "{:<6} {:<16} {:<10} {:<20}",
                    region.to_string(),
                    region.domain(),
                    region.currency_symbol(),
                    region.bestsellers_heading()
                );
            }
        }
    }

    Ok(())
}
