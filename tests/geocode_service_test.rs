// GeocodeService tests against a mocked OneMap search API

mod common;

use common::{geocode_service, onemap_empty, onemap_hit, SEARCH_PATH};
use lightning_tracker_service::normalize::QueryKind;
use mockito::{Matcher, Server};

#[tokio::test]
async fn test_table_hit_makes_no_network_call() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = geocode_service(&server.url()).geocode("238874").await;

    assert!(result.success);
    assert_eq!(result.query_type, QueryKind::PostalCode);
    assert!((result.latitude.unwrap() - 1.304167).abs() < 1e-6);
    assert!((result.longitude.unwrap() - 103.833611).abs() < 1e-6);
    assert_eq!(result.building.as_deref(), Some("ION Orchard"));
    assert_eq!(result.postal_code.as_deref(), Some("238874"));
    assert_eq!(result.error, None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_building_resolved_over_network() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("searchVal".into(), "Raffles Hotel".into()),
            Matcher::UrlEncoded("returnGeom".into(), "Y".into()),
            Matcher::UrlEncoded("getAddrDetails".into(), "Y".into()),
            Matcher::UrlEncoded("pageNum".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            onemap_hit(
                "1 BEACH ROAD RAFFLES HOTEL SINGAPORE 189673",
                "1.29475",
                "103.85419",
            )
            .to_string(),
        )
        .create_async()
        .await;

    let result = geocode_service(&server.url())
        .geocode("  Raffles Hotel ")
        .await;

    assert!(result.success, "unexpected failure: {:?}", result.error);
    assert_eq!(result.query, "Raffles Hotel");
    assert_eq!(result.query_type, QueryKind::Building);
    assert_eq!(result.latitude, Some(1.29475));
    assert_eq!(result.longitude, Some(103.85419));
    assert_eq!(result.road.as_deref(), Some("BEACH ROAD"));
    assert_eq!(result.postal_code.as_deref(), Some("189673"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_address_with_embedded_postal_code_goes_to_network() {
    let mut server = Server::new_async().await;

    let query = "123 Example Rd, Singapore 238874";
    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("searchVal".into(), query.into()))
        .with_status(200)
        .with_body(onemap_empty().to_string())
        .create_async()
        .await;

    let result = geocode_service(&server.url()).geocode(query).await;

    assert!(!result.success);
    assert_eq!(result.query_type, QueryKind::Address);
    assert_eq!(
        result.error.as_deref(),
        Some("Address not found in OneMap database")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_postal_code_keeps_cleaned_code() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("searchVal".into(), "555555".into()))
        .with_status(200)
        .with_body(onemap_empty().to_string())
        .create_async()
        .await;

    let result = geocode_service(&server.url())
        .geocode_postal_code("S 555555")
        .await;

    assert!(!result.success);
    assert_eq!(result.latitude, None);
    assert_eq!(result.postal_code.as_deref(), Some("555555"));
    assert_eq!(
        result.error.as_deref(),
        Some("Postal code not found in OneMap database")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_result_outside_singapore_is_rejected() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(onemap_hit("BATAM CENTRE", "1.05", "104.03").to_string())
        .create_async()
        .await;

    let result = geocode_service(&server.url())
        .geocode_building("Batam Centre")
        .await;

    assert!(!result.success);
    assert_eq!(result.latitude, None);
    assert_eq!(result.longitude, None);
    assert_eq!(
        result.error.as_deref(),
        Some("Failed to extract valid coordinates")
    );
}

#[tokio::test]
async fn test_invalid_postal_code_format_makes_no_call() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = geocode_service(&server.url())
        .geocode_postal_code("12345")
        .await;

    assert!(!result.success);
    assert_eq!(result.query_type, QueryKind::PostalCode);
    assert_eq!(
        result.error.as_deref(),
        Some("Invalid postal code format: '12345'")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_input_makes_no_call() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = geocode_service(&server.url());

    let result = service.geocode("   ").await;
    assert!(!result.success);
    assert_eq!(result.query_type, QueryKind::Unknown);
    assert_eq!(
        result.error.as_deref(),
        Some("Invalid query: empty or non-string input")
    );

    let result = service.geocode_address("").await;
    assert_eq!(
        result.error.as_deref(),
        Some("Invalid address: empty or non-string input")
    );

    let result = service.geocode_building("").await;
    assert_eq!(
        result.error.as_deref(),
        Some("Invalid building name: empty or non-string input")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_transport_failure_collapses_to_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let result = geocode_service(&server.url())
        .geocode("Marina Bay Sands")
        .await;

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("Building not found in OneMap database")
    );
}
