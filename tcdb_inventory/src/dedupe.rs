use std::collections::HashSet;

use crate::model::CardRecord;

/// Keeps the first record seen for each detail URL, preserving input order.
pub fn dedupe(cards: impl IntoIterator<Item = CardRecord>) -> Vec<CardRecord> {
    let mut seen = HashSet::new();
    cards
        .into_iter()
        .filter(|card| seen.insert(card.card_url.clone()))
        .collect()
}
