//! Approximate prices from card detail pages.
//!
//! Detail pages show prices as free text, so the lowest dollar amount on the
//! page is taken as the card's price.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tcdb_client::Session;

use crate::model::{CardRecord, PriceSource};

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*([0-9]+(?:\.[0-9]{1,2})?)").expect("money pattern")
});

/// Returns the smallest dollar amount in `text`, rounded to cents.
pub fn parse_price(text: &str) -> Option<f64> {
    MONEY
        .captures_iter(text)
        .filter_map(|cap| cap[1].parse::<f64>().ok())
        .filter(|price| price.is_finite())
        .reduce(f64::min)
        .map(|price| (price * 100.0).round() / 100.0)
}

/// Receives per-card notifications during enrichment.
pub trait PriceProgress {
    fn start(&self, _total: usize) {}
    fn card_done(&self, _card: &CardRecord) {}
    fn finish(&self) {}
}

/// Observer that ignores all notifications.
pub struct NoProgress;

impl PriceProgress for NoProgress {}

/// Limits and pacing for price enrichment.
#[derive(Debug, Clone)]
pub struct PricingOptions {
    /// Maximum number of cards to price; 0 prices every card.
    pub max_cards: usize,
    /// Pause after each detail page request.
    pub card_delay: Duration,
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            max_cards: 0,
            card_delay: Duration::from_millis(450),
        }
    }
}

/// Summary of an enrichment run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PricingStats {
    pub attempted: usize,
    pub priced: usize,
    pub not_found: usize,
    pub errors: usize,
}

/// Fetches each card's detail page in order and records the price found there.
///
/// A failed fetch marks only that card as [`PriceSource::FetchError`]; the
/// remaining cards are still processed.
pub async fn enrich_prices(
    session: &Session,
    cards: &mut [CardRecord],
    options: &PricingOptions,
    progress: &dyn PriceProgress,
) -> PricingStats {
    let total = match options.max_cards {
        0 => cards.len(),
        cap => cap.min(cards.len()),
    };
    let mut stats = PricingStats::default();
    progress.start(total);

    for (i, card) in cards.iter_mut().enumerate().take(total) {
        stats.attempted += 1;
        match session.fetch(&card.card_url).await {
            Ok(page) => {
                card.tcdb_price = parse_price(&page.body);
                card.tcdb_price_source = if card.tcdb_price.is_some() {
                    stats.priced += 1;
                    PriceSource::Fetched
                } else {
                    stats.not_found += 1;
                    PriceSource::NotFound
                };
            }
            Err(err) => {
                tracing::warn!("Failed to price {}: {}", card.card_url, err);
                card.tcdb_price = None;
                card.tcdb_price_source = PriceSource::FetchError;
                stats.errors += 1;
            }
        }
        progress.card_done(card);

        if options.max_cards > 0 && i + 1 >= options.max_cards {
            break;
        }
        if !options.card_delay.is_zero() {
            tokio::time::sleep(options.card_delay).await;
        }
    }

    progress.finish();
    tracing::info!(
        "Priced {} of {} cards ({} without a price, {} errors)",
        stats.priced,
        stats.attempted,
        stats.not_found,
        stats.errors
    );
    stats
}
