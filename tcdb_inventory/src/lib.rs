//! Library layer for the TCDB inventory sync.
//!
//! Walks a paginated tcdb.com collection listing through the
//! `tcdb_client` session, turns the inventory table into card records,
//! optionally prices each card from its detail page, and builds the JSON
//! payload.

pub mod dedupe;
pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod pricing;
pub mod sync;

pub use tcdb_client;
pub use tcdb_client::{RetryPolicy, Session};

pub use dedupe::dedupe;
pub use error::SyncError;
pub use extract::{parse_inventory_page, InventoryExtractor, InventoryPage, TableHeuristic};
pub use model::{CardRecord, PriceSource};
pub use output::{write_payload, InventoryPayload, Totals};
pub use pricing::{
    enrich_prices, parse_price, NoProgress, PriceProgress, PricingOptions, PricingStats,
};
pub use sync::{collect_cards, run_sync, SyncConfig, SyncReport};
