//! JSON payload written at the end of a sync.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::model::CardRecord;

pub const SITE: &str = "tcdb.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub inventory_url: String,
    pub site: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Unique cards.
    pub cards: usize,
    /// Sum of quantities.
    pub units: u64,
    pub priced_cards: usize,
}

impl Totals {
    pub fn from_cards(cards: &[CardRecord]) -> Self {
        Self {
            cards: cards.len(),
            units: cards.iter().map(|c| u64::from(c.quantity)).sum(),
            priced_cards: cards.iter().filter(|c| c.tcdb_price.is_some()).count(),
        }
    }
}

/// The document written to the output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryPayload {
    pub source: Source,
    /// UTC timestamp, RFC 3339 with microseconds.
    pub generated_at: String,
    pub totals: Totals,
    pub cards: Vec<CardRecord>,
}

impl InventoryPayload {
    pub fn build(inventory_url: &str, cards: Vec<CardRecord>) -> Self {
        Self {
            source: Source {
                inventory_url: inventory_url.to_string(),
                site: SITE.to_string(),
            },
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            totals: Totals::from_cards(&cards),
            cards,
        }
    }
}

/// Writes the payload as indented JSON, creating parent directories.
pub fn write_payload(path: &Path, payload: &InventoryPayload) -> Result<(), SyncError> {
    let io_err = |source: std::io::Error| SyncError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(path, json).map_err(io_err)?;
    Ok(())
}
