//! Inventory sync pipeline: paginate, extract, dedupe, optionally price.

use std::path::PathBuf;
use std::time::Duration;

use tcdb_client::Session;

use crate::dedupe::dedupe;
use crate::error::SyncError;
use crate::extract::InventoryExtractor;
use crate::model::CardRecord;
use crate::output::InventoryPayload;
use crate::pricing::{enrich_prices, PriceProgress, PricingOptions, PricingStats};

pub const DEFAULT_INVENTORY_URL: &str =
    "https://www.tcdb.com/ViewCollectionMode.cfm?Member=RSmith1217&MODE=&Type=Baseball&CollectionID=1";
pub const DEFAULT_OUTPUT: &str = "Inventory/data/tcdb_inventory.json";
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub inventory_url: String,
    pub output: PathBuf,
    pub max_pages: usize,
    /// Pause after each listing page.
    pub page_delay: Duration,
    /// `None` skips price enrichment.
    pub pricing: Option<PricingOptions>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            inventory_url: DEFAULT_INVENTORY_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: Duration::from_millis(350),
            pricing: None,
        }
    }
}

/// Result of [`run_sync`].
#[derive(Debug)]
pub struct SyncReport {
    pub payload: InventoryPayload,
    /// Enrichment counts; `None` when pricing was skipped.
    pub pricing: Option<PricingStats>,
}

/// Follows "next" links from `start_url` and collects every card row.
///
/// Stops when a page has no next link or `max_pages` pages have been read.
/// Any fetch failure aborts the walk.
pub async fn collect_cards(
    session: &Session,
    extractor: &dyn InventoryExtractor,
    start_url: &str,
    max_pages: usize,
    page_delay: Duration,
) -> Result<Vec<CardRecord>, SyncError> {
    let mut url = Some(start_url.to_string());
    let mut page_count = 0usize;
    let mut cards = Vec::new();

    while let Some(current) = url.take() {
        if page_count >= max_pages {
            tracing::info!("Stopping at page limit ({})", max_pages);
            break;
        }
        page_count += 1;

        let page = session
            .fetch(&current)
            .await
            .map_err(|source| SyncError::Fetch {
                page: page_count,
                source,
            })?;
        let parsed = extractor.extract(&page.url, &page.body);
        tracing::info!(
            "Inventory page {} ({} cards){}",
            page_count,
            parsed.cards.len(),
            if parsed.next_url.is_some() { "" } else { ", last page" }
        );

        cards.extend(parsed.cards);
        url = parsed.next_url.map(String::from);

        if !page_delay.is_zero() {
            tokio::time::sleep(page_delay).await;
        }
    }

    Ok(cards)
}

/// Runs the whole pipeline and returns the payload to write.
pub async fn run_sync(
    session: &Session,
    extractor: &dyn InventoryExtractor,
    config: &SyncConfig,
    progress: &dyn PriceProgress,
) -> Result<SyncReport, SyncError> {
    let collected = collect_cards(
        session,
        extractor,
        &config.inventory_url,
        config.max_pages,
        config.page_delay,
    )
    .await?;
    let scraped = collected.len();
    let mut cards = dedupe(collected);
    tracing::info!("{} rows scraped, {} unique cards", scraped, cards.len());

    let pricing = match &config.pricing {
        Some(options) => Some(enrich_prices(session, &mut cards, options, progress).await),
        None => None,
    };

    Ok(SyncReport {
        payload: InventoryPayload::build(&config.inventory_url, cards),
        pricing,
    })
}
