//! Integration tests for the holiday lookup service against a mock HTTP
//! source: cache freshness, 404 semantics, retry exhaustion and batch
//! prefetch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use fairhour_core::{EngineError, Holiday, HolidayApiClient, HolidayService, HolidayStore, RetryPolicy};

const SCOPE: &str = "test-tenant";

const US_2026_BODY: &str = r#"[
    {"date": "2026-01-01", "name": "New Year's Day", "localName": "New Year's Day",
     "countryCode": "US", "fixed": false, "global": true, "counties": null, "types": ["Public"]},
    {"date": "2026-07-04", "name": "Independence Day", "localName": "Independence Day",
     "countryCode": "US", "fixed": false, "global": true, "counties": null, "types": ["Public"]}
]"#;

fn service(server: &mockito::ServerGuard, store: Arc<HolidayStore>) -> HolidayService {
    let client = HolidayApiClient::new(&server.url())
        .unwrap()
        .with_retry(RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
        });
    HolidayService::new(client, store, SCOPE)
}

#[tokio::test]
async fn second_fetch_within_ttl_issues_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/PublicHolidays/2026/US")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(US_2026_BODY)
        .expect(1)
        .create_async()
        .await;

    let service = service(&server, Arc::new(HolidayStore::open_memory().unwrap()));

    let first = service.fetch_holidays("US", 2026).await.unwrap();
    let second = service.fetch_holidays("US", 2026).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn stale_entry_triggers_a_second_network_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/PublicHolidays/2026/US")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(US_2026_BODY)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(HolidayStore::open_memory().unwrap());
    // Entry written 8 days ago: outside the 7-day freshness window.
    let stale = vec![Holiday {
        date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        name: "Outdated".to_string(),
        local_name: "Outdated".to_string(),
        country: "US".to_string(),
    }];
    store
        .upsert(SCOPE, "US", 2026, &stale, Utc::now() - ChronoDuration::days(8))
        .unwrap();

    let service = service(&server, Arc::clone(&store));
    let refreshed = service.fetch_holidays("US", 2026).await.unwrap();

    assert_eq!(refreshed.len(), 2);
    assert_eq!(refreshed[0].name, "New Year's Day");
    mock.assert_async().await;

    // The refresh replaced the stale row.
    let entry = store.get(SCOPE, "US", 2026).unwrap().unwrap();
    assert_eq!(entry.holidays.len(), 2);
}

#[tokio::test]
async fn fresh_entry_is_served_without_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/PublicHolidays/2026/US")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(HolidayStore::open_memory().unwrap());
    let cached = vec![Holiday {
        date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        name: "New Year's Day".to_string(),
        local_name: "New Year's Day".to_string(),
        country: "US".to_string(),
    }];
    store
        .upsert(SCOPE, "US", 2026, &cached, Utc::now() - ChronoDuration::days(6))
        .unwrap();

    let service = service(&server, store);
    let holidays = service.fetch_holidays("US", 2026).await.unwrap();

    assert_eq!(holidays, cached);
    mock.assert_async().await;
}

#[tokio::test]
async fn not_found_is_an_empty_result_with_a_single_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/PublicHolidays/2026/XK")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let service = service(&server, Arc::new(HolidayStore::open_memory().unwrap()));

    let holidays = service.fetch_holidays("XK", 2026).await.unwrap();
    assert!(holidays.is_empty());

    // The 404 answer is authoritative and cached: a repeat lookup stays off
    // the network.
    let again = service.fetch_holidays("XK", 2026).await.unwrap();
    assert!(again.is_empty());

    mock.assert_async().await;
}

#[tokio::test]
async fn transient_failures_retry_then_degrade_to_empty() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/PublicHolidays/2026/US")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let store = Arc::new(HolidayStore::open_memory().unwrap());
    let service = service(&server, Arc::clone(&store));

    let holidays = service.fetch_holidays("US", 2026).await.unwrap();
    assert!(holidays.is_empty());
    mock.assert_async().await;

    // Degradation is not cached: "don't know" must not become "no holidays".
    assert!(store.get(SCOPE, "US", 2026).unwrap().is_none());
}

#[tokio::test]
async fn invalid_arguments_fail_fast_without_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = service(&server, Arc::new(HolidayStore::open_memory().unwrap()));

    let err = service.fetch_holidays("USA", 2026).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = service.fetch_holidays("US", 1899).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn prefetch_loads_every_country_year_pair() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for (country, year) in [("US", 2026), ("US", 2027), ("JP", 2026), ("JP", 2027)] {
        let mock = server
            .mock("GET", format!("/PublicHolidays/{year}/{country}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let service = service(&server, Arc::new(HolidayStore::open_memory().unwrap()));
    let loaded = service
        .prefetch_years(&["US".to_string(), "JP".to_string()], &[2026, 2027])
        .await;

    assert_eq!(loaded, 4);
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn prefetch_swallows_individual_failures() {
    let mut server = mockito::Server::new_async().await;
    let good = server
        .mock("GET", "/PublicHolidays/2026/US")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let service = service(&server, Arc::new(HolidayStore::open_memory().unwrap()));

    // "Nowhere" is not a valid country code; its failure must not abort the
    // batch. Source-level failures degrade inside fetch_holidays and still
    // count as loaded.
    let loaded = service
        .prefetch_years(&["US".to_string(), "Nowhere".to_string()], &[2026])
        .await;

    assert_eq!(loaded, 1);
    good.assert_async().await;
}
