//! Progress bar for price enrichment.

use indicatif::{ProgressBar, ProgressStyle};
use tcdb_inventory::{CardRecord, PriceProgress, PriceSource};

/// Draws an indicatif bar while detail pages are fetched.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceProgress for ProgressBarObserver {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} ({eta}) {msg}",
        ) {
            self.bar.set_style(style);
        }
        self.bar.set_message("pricing cards...");
    }

    fn card_done(&self, card: &CardRecord) {
        if card.tcdb_price_source == PriceSource::FetchError {
            self.bar.set_message(format!("error on {}", card.card_url));
        }
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message("pricing done");
    }
}
