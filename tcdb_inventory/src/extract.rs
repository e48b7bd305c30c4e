//! Inventory table extraction.
//!
//! The listing pages have no stable ids or classes, so the inventory table is
//! located by its visible text and the columns are read by position. All of
//! that lives behind [`InventoryExtractor`] so it can be replaced or tested
//! against saved pages without any network access.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::model::CardRecord;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static DETAIL_LINK: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"a[href*="/Card.cfm"], a[href*="/Cards/"], a[href*="/cards/"]"#)
});
static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{1,3})\b").expect("quantity pattern"));

const NEXT_LABELS: [&str; 5] = ["next", "next >", "next >>", ">", ">>"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Cards found on one listing page plus the link to the following page.
#[derive(Debug, Default)]
pub struct InventoryPage {
    pub cards: Vec<CardRecord>,
    pub next_url: Option<Url>,
}

/// Turns a listing page into records.
pub trait InventoryExtractor {
    /// `page_url` is the URL the page was actually served from; relative
    /// links are resolved against it.
    fn extract(&self, page_url: &Url, html: &str) -> InventoryPage;
}

/// Text-matching table heuristic for tcdb.com collection pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableHeuristic;

impl InventoryExtractor for TableHeuristic {
    fn extract(&self, page_url: &Url, html: &str) -> InventoryPage {
        parse_inventory_page(page_url, html)
    }
}

/// Extracts card rows and the next page link from a listing page.
pub fn parse_inventory_page(page_url: &Url, html: &str) -> InventoryPage {
    let document = Html::parse_document(html);
    let next_url = find_next_url(&document, page_url);

    let Some(table) = find_inventory_table(&document) else {
        tracing::debug!("No inventory table on {}", page_url);
        return InventoryPage {
            cards: Vec::new(),
            next_url,
        };
    };

    let cards: Vec<CardRecord> = table
        .select(&ROW)
        .filter_map(|row| parse_row(row, page_url))
        .collect();
    tracing::debug!("Found {} card rows on {}", cards.len(), page_url);

    InventoryPage { cards, next_url }
}

fn find_inventory_table(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&TABLE).find(|table| {
        let text = element_text(*table).to_lowercase();
        text.contains("card")
            && (text.contains("qty") || text.contains("quantity") || text.contains("player"))
    })
}

fn parse_row(row: ElementRef<'_>, page_url: &Url) -> Option<CardRecord> {
    let cols: Vec<String> = row.select(&CELL).map(element_text).collect();
    if cols.len() < 2 {
        return None;
    }

    let link = row.select(&DETAIL_LINK).next()?;
    let href = link.value().attr("href").unwrap_or_default().trim();
    if href.is_empty() {
        return None;
    }
    let card_url = page_url.join(href).ok()?;

    let col = |i: usize| cols.get(i).cloned().unwrap_or_default();
    let card_name = cols.get(2).cloned().unwrap_or_else(|| element_text(link));

    Some(CardRecord {
        set_name: col(0),
        card_number: col(1),
        card_name,
        player: col(3),
        team: col(4),
        quantity: parse_quantity(&cols),
        ..CardRecord::new(card_url)
    })
}

/// Scans cells from the right for a standalone 1-3 digit number.
pub fn parse_quantity<S: AsRef<str>>(cols: &[S]) -> u32 {
    cols.iter()
        .rev()
        .find_map(|col| {
            QUANTITY
                .captures_iter(col.as_ref())
                .filter_map(|cap| cap[1].parse::<u32>().ok())
                .find(|qty| *qty > 0)
        })
        .unwrap_or(1)
}

/// Finds the "next page" link, if any.
pub fn find_next_url(document: &Html, base_url: &Url) -> Option<Url> {
    let anchors: Vec<ElementRef<'_>> = document.select(&ANCHOR).collect();

    let preferred = anchors.iter().find(|a| {
        let rel_next = a
            .value()
            .attr("rel")
            .is_some_and(|rel| rel.split_whitespace().any(|token| token == "next"));
        let title_next = a
            .value()
            .attr("title")
            .is_some_and(|title| title.to_lowercase().contains("next"));
        rel_next || title_next
    });

    let link = preferred.or_else(|| {
        anchors.iter().find(|a| {
            let text = element_text(**a).to_lowercase();
            NEXT_LABELS.contains(&text.as_str()) || text.starts_with("next")
        })
    })?;

    let href = link.value().attr("href").unwrap_or_default().trim();
    if href.is_empty() {
        return None;
    }
    base_url.join(href).ok()
}

/// Visible text with each text node trimmed and joined by single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
