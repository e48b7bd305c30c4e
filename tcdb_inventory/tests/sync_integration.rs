use std::time::{Duration, Instant};

use tcdb_inventory::{
    collect_cards, enrich_prices, run_sync, CardRecord, NoProgress, PriceSource, PricingOptions,
    PricingStats, RetryPolicy, Session, SyncConfig, SyncError, TableHeuristic,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session() -> Session {
    let retry = RetryPolicy {
        attempts: 2,
        initial_delay: Duration::from_millis(1),
        multiplier: 1.75,
    };
    Session::with_retry("", retry).unwrap()
}

fn listing(rows: &[(u32, &str, u32)], next: Option<&str>) -> String {
    let mut html = String::from(
        "<html><body><table><tr><th>Set</th><th>#</th><th>Card</th><th>Player</th><th>Team</th><th>Qty</th></tr>",
    );
    for (id, name, qty) in rows {
        html.push_str(&format!(
            "<tr><td>1990 Topps</td><td>{id}</td><td><a href=\"/Card.cfm?ID={id}\">{name}</a></td>\
             <td>{name}</td><td>Red Sox</td><td>Qty: {qty}</td></tr>"
        ));
    }
    html.push_str("</table>");
    if let Some(next) = next {
        html.push_str(&format!("<a href=\"{next}\">Next &gt;</a>"));
    }
    html.push_str("</body></html>");
    html
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/ViewCollectionMode.cfm"))
        .and(query_param("PageIndex", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config(server: &MockServer) -> SyncConfig {
    SyncConfig {
        inventory_url: format!("{}/ViewCollectionMode.cfm?PageIndex=1", server.uri()),
        page_delay: Duration::ZERO,
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn follows_next_links_and_dedupes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        listing(
            &[(1, "Alpha", 1), (2, "Bravo", 2)],
            Some("ViewCollectionMode.cfm?PageIndex=2"),
        ),
    )
    .await;
    mount_page(
        &server,
        "2",
        listing(&[(2, "Bravo again", 9), (3, "Charlie", 3)], None),
    )
    .await;

    let report = run_sync(&session(), &TableHeuristic, &config(&server), &NoProgress)
        .await
        .unwrap();
    assert!(report.pricing.is_none());
    let payload = report.payload;

    let names: Vec<_> = payload.cards.iter().map(|c| c.card_name.as_str()).collect();
    assert_eq!(names, ["Alpha", "Bravo", "Charlie"]);
    assert_eq!(payload.totals.cards, 3);
    assert_eq!(payload.totals.units, 6);
    assert_eq!(payload.totals.priced_cards, 0);
    assert_eq!(
        payload.cards[0].card_url,
        format!("{}/Card.cfm?ID=1", server.uri())
    );
    assert!(payload
        .cards
        .iter()
        .all(|c| c.tcdb_price_source == PriceSource::Unresolved));
}

#[tokio::test]
async fn pagination_stops_at_page_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ViewCollectionMode.cfm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(
            &[(1, "Loop", 1)],
            Some("ViewCollectionMode.cfm?PageIndex=1"),
        )))
        .expect(3)
        .mount(&server)
        .await;

    let cards = collect_cards(
        &session(),
        &TableHeuristic,
        &format!("{}/ViewCollectionMode.cfm?PageIndex=1", server.uri()),
        3,
        Duration::ZERO,
    )
    .await
    .unwrap();
    assert_eq!(cards.len(), 3);
}

#[tokio::test]
async fn listing_failure_aborts_the_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        listing(&[(1, "Alpha", 1)], Some("ViewCollectionMode.cfm?PageIndex=2")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/ViewCollectionMode.cfm"))
        .and(query_param("PageIndex", "2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = run_sync(&session(), &TableHeuristic, &config(&server), &NoProgress)
        .await
        .unwrap_err();
    match err {
        SyncError::Fetch { page, source } => {
            assert_eq!(page, 2);
            assert_eq!(source.status(), Some(403));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn pricing_tags_each_outcome() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        listing(&[(1, "Priced", 1), (2, "Unpriced", 1), (3, "Broken", 1)], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/Card.cfm"))
        .and(query_param("ID", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<p>$12.50 each, was $15.00</p>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Card.cfm"))
        .and(query_param("ID", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>No sales yet</p>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Card.cfm"))
        .and(query_param("ID", "3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let cfg = SyncConfig {
        pricing: Some(PricingOptions {
            max_cards: 0,
            card_delay: Duration::ZERO,
        }),
        ..config(&server)
    };
    let report = run_sync(&session(), &TableHeuristic, &cfg, &NoProgress)
        .await
        .unwrap();
    assert_eq!(
        report.pricing,
        Some(PricingStats {
            attempted: 3,
            priced: 1,
            not_found: 1,
            errors: 1,
        })
    );
    let payload = report.payload;

    assert_eq!(payload.cards[0].tcdb_price, Some(12.5));
    assert_eq!(payload.cards[0].tcdb_price_source, PriceSource::Fetched);
    assert_eq!(payload.cards[1].tcdb_price, None);
    assert_eq!(payload.cards[1].tcdb_price_source, PriceSource::NotFound);
    assert_eq!(payload.cards[2].tcdb_price, None);
    assert_eq!(payload.cards[2].tcdb_price_source, PriceSource::FetchError);
    assert_eq!(payload.totals.priced_cards, 1);
}

#[tokio::test]
async fn pricing_respects_card_cap() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        listing(&[(1, "A", 1), (2, "B", 1), (3, "C", 1)], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/Card.cfm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("$4.00"))
        .expect(2)
        .mount(&server)
        .await;

    let cfg = SyncConfig {
        pricing: Some(PricingOptions {
            max_cards: 2,
            card_delay: Duration::ZERO,
        }),
        ..config(&server)
    };
    let payload = run_sync(&session(), &TableHeuristic, &cfg, &NoProgress)
        .await
        .unwrap()
        .payload;

    assert_eq!(payload.totals.priced_cards, 2);
    assert_eq!(payload.cards[2].tcdb_price_source, PriceSource::Unresolved);
}

// The session's request timeout runs on the tokio clock, so these use real
// time with short delays instead of a paused runtime.

#[tokio::test]
async fn page_delay_follows_each_listing_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "1",
        listing(&[(1, "Alpha", 1)], Some("ViewCollectionMode.cfm?PageIndex=2")),
    )
    .await;
    mount_page(&server, "2", listing(&[(2, "Bravo", 1)], None)).await;

    let delay = Duration::from_millis(120);
    let started = Instant::now();
    let cards = collect_cards(
        &session(),
        &TableHeuristic,
        &format!("{}/ViewCollectionMode.cfm?PageIndex=1", server.uri()),
        10,
        delay,
    )
    .await
    .unwrap();

    assert_eq!(cards.len(), 2);
    assert!(started.elapsed() >= delay * 2, "elapsed {:?}", started.elapsed());
}

#[tokio::test]
async fn card_delay_is_skipped_after_the_capped_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Card.cfm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("$4.00"))
        .expect(2)
        .mount(&server)
        .await;

    let mut cards: Vec<_> = (1..=3)
        .map(|id| CardRecord::new(format!("{}/Card.cfm?ID={}", server.uri(), id)))
        .collect();
    let delay = Duration::from_millis(300);
    let options = PricingOptions {
        max_cards: 2,
        card_delay: delay,
    };

    let started = Instant::now();
    let stats = enrich_prices(&session(), &mut cards, &options, &NoProgress).await;
    let elapsed = started.elapsed();

    assert_eq!(stats.attempted, 2);
    assert_eq!(stats.priced, 2);
    // one pause between the two priced cards, none after the second
    assert!(elapsed >= delay, "elapsed {:?}", elapsed);
    assert!(elapsed < delay * 2, "elapsed {:?}", elapsed);
}
