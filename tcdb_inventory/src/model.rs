//! Normalized card records.

use serde::{Deserialize, Serialize};

/// Where a record's price came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// Pricing was not attempted for this record.
    #[default]
    #[serde(rename = "")]
    Unresolved,
    /// A dollar amount was found on the detail page.
    #[serde(rename = "tcdb-page")]
    Fetched,
    /// The detail page loaded but contained no dollar amount.
    #[serde(rename = "not-found")]
    NotFound,
    /// The detail page could not be fetched.
    #[serde(rename = "fetch-error")]
    FetchError,
}

/// One card row from the inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Absolute detail page URL, unique per record after dedupe.
    pub card_url: String,
    pub set_name: String,
    pub card_number: String,
    pub card_name: String,
    pub player: String,
    pub team: String,
    pub quantity: u32,
    pub tcdb_price: Option<f64>,
    pub tcdb_price_source: PriceSource,
}

impl CardRecord {
    /// A record with only the detail URL set and quantity 1.
    pub fn new(card_url: impl Into<String>) -> Self {
        Self {
            card_url: card_url.into(),
            set_name: String::new(),
            card_number: String::new(),
            card_name: String::new(),
            player: String::new(),
            team: String::new(),
            quantity: 1,
            tcdb_price: None,
            tcdb_price_source: PriceSource::Unresolved,
        }
    }
}
