mod progress;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tcdb_inventory::sync::{DEFAULT_INVENTORY_URL, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT};
use tcdb_inventory::tcdb_client::read_cookie_file;
use tcdb_inventory::{run_sync, write_payload, PricingOptions, Session, SyncConfig, TableHeuristic};

use crate::progress::ProgressBarObserver;

#[derive(Parser)]
#[command(name = "tcdb-sync")]
#[command(about = "Sync a TCDB collection page to JSON")]
struct Cli {
    /// Collection listing URL to start from
    #[arg(long, env = "TCDB_INVENTORY_URL", default_value = DEFAULT_INVENTORY_URL)]
    inventory_url: String,

    /// File holding the tcdb.com session cookie
    #[arg(long, env = "TCDB_COOKIE_FILE")]
    cookie_file: Option<PathBuf>,

    /// Output JSON path
    #[arg(long, env = "TCDB_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Maximum listing pages to follow
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Fetch each card's detail page for a price
    #[arg(long)]
    price_cards: bool,

    /// Limit priced card pages (0 = all)
    #[arg(long, default_value_t = 0)]
    max_cards: usize,

    /// Seconds to wait between listing pages
    #[arg(long, default_value = "0.35", value_parser = parse_seconds)]
    page_delay: Duration,

    /// Seconds to wait between card detail pages
    #[arg(long, default_value = "0.45", value_parser = parse_seconds)]
    card_delay: Duration,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            inventory_url: self.inventory_url.clone(),
            output: self.output.clone(),
            max_pages: self.max_pages,
            page_delay: self.page_delay,
            pricing: self.price_cards.then(|| PricingOptions {
                max_cards: self.max_cards,
                card_delay: self.card_delay,
            }),
        }
    }
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", raw))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("delay must be non-negative: {}", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tcdb_inventory=info".parse()?)
                .add_directive("tcdb_client=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.sync_config();

    let cookie = read_cookie_file(cli.cookie_file.as_deref())?;
    if cookie.is_empty() {
        tracing::debug!("No cookie configured, fetching anonymously");
    }
    let session = Session::new(&cookie).context("failed to set up HTTP session")?;

    let progress = ProgressBarObserver::new();
    let report = run_sync(&session, &TableHeuristic, &config, &progress).await?;
    if let Some(stats) = report.pricing.filter(|stats| stats.errors > 0) {
        tracing::warn!(
            "{} of {} detail pages failed to load; those cards are tagged fetch-error",
            stats.errors,
            stats.attempted
        );
    }

    let payload = report.payload;
    write_payload(&config.output, &payload)?;
    println!(
        "Wrote {} cards to {}",
        payload.totals.cards,
        config.output.display()
    );

    Ok(())
}
