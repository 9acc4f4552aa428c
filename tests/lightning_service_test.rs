// LightningService tests against a mocked weather API
// Uses mockito for HTTP mocking

mod common;

use common::{lightning_payload, lightning_service, WEATHER_PATH};
use lightning_tracker_service::services::lightning_service::{
    FETCH_FAILED_MESSAGE, PARSE_FAILED_MESSAGE,
};
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_summary_from_valid_payload() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::UrlEncoded("api".into(), "lightning".into()))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(lightning_payload().to_string())
        .create_async()
        .await;

    let service = lightning_service(&server.url());
    let summary = service.get_lightning_summary(None).await;

    assert!(summary.success, "unexpected failure: {:?}", summary.error);
    assert_eq!(summary.error, None);
    assert_eq!(summary.raw_period_count, 3);
    assert_eq!(summary.total_strikes, 3);
    assert_eq!(summary.records_with_lightning, 2);
    assert_eq!(summary.coordinates.len(), 3);
    assert_eq!(summary.pagination_token.as_deref(), Some("token-2"));

    // Delivery order is kept
    assert_eq!(summary.coordinates[0].strike_type, "G");
    assert_eq!(summary.coordinates[1].strike_type, "C");
    assert_eq!(summary.coordinates[2].latitude, 1.41);
    assert_eq!(
        summary.coordinates[2].record_datetime.as_deref(),
        Some("2024-01-15T14:35:00+08:00")
    );
    // Reading without its own timestamp keeps only the period's
    assert_eq!(summary.coordinates[2].datetime, None);

    assert_eq!(
        summary.time_range.earliest.as_deref(),
        Some("2024-01-15T14:25:00+08:00")
    );
    assert_eq!(
        summary.time_range.latest.as_deref(),
        Some("2024-01-15T14:35:00+08:00")
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_out_of_region_strike_is_plotted_but_not_counted_within_bounds() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(lightning_payload().to_string())
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(None)
        .await;

    assert_eq!(summary.coordinates.len(), 3);
    assert_eq!(summary.strikes_within_bounds, 2);
    assert!(summary
        .coordinates
        .iter()
        .any(|s| s.latitude == 5.2 && s.longitude == 100.4));
}

#[tokio::test]
async fn test_malformed_reading_keeps_valid_siblings() {
    let mut server = Server::new_async().await;

    let payload = json!({
        "code": 0,
        "data": { "records": [ {
            "datetime": "2024-01-15T14:30:00+08:00",
            "item": { "type": "observation", "readings": [
                {
                    "location": { "latitude": "1.35", "longitude": "103.82" },
                    "type": "G",
                    "text": "Cloud to Ground"
                },
                { "location": { "latitude": "1.36", "longitude": "103.83" }, "type": 7 },
                null
            ] }
        } ] }
    });

    let _mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(payload.to_string())
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(None)
        .await;

    assert!(summary.success, "unexpected failure: {:?}", summary.error);
    assert_eq!(summary.total_strikes, 2);
    assert_eq!(summary.records_with_lightning, 1);
    assert_eq!(summary.coordinates[0].strike_type, "G");
    assert_eq!(summary.coordinates[1].strike_type, "7");
}

#[tokio::test]
async fn test_date_filter_is_forwarded() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("api".into(), "lightning".into()),
            Matcher::UrlEncoded("date".into(), "2024-01-15T14:30:00".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "code": 0, "data": { "records": [] } }).to_string())
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(Some("2024-01-15T14:30:00"))
        .await;

    assert!(summary.success);
    assert_eq!(summary.total_strikes, 0);
    assert_eq!(summary.time_range.earliest, None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_date_filter_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(Some("15/01/2024"))
        .await;

    assert!(!summary.success);
    let error = summary.error.unwrap();
    assert!(error.starts_with("Invalid date filter"), "got: {error}");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_code_is_reported_with_embedded_message() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "code": 1, "errorMsg": "Invalid date format", "data": null }).to_string())
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(None)
        .await;

    assert!(!summary.success);
    let error = summary.error.unwrap();
    assert!(error.starts_with(PARSE_FAILED_MESSAGE), "got: {error}");
    assert!(error.contains("Invalid date format"), "got: {error}");
    assert!(summary.coordinates.is_empty());
}

#[tokio::test]
async fn test_empty_object_is_invalid_response() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(None)
        .await;

    assert!(!summary.success);
    assert!(summary.error.unwrap().starts_with(PARSE_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_server_error_is_fetch_failure() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(None)
        .await;

    assert!(!summary.success);
    assert_eq!(summary.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(summary.total_strikes, 0);
}

#[tokio::test]
async fn test_non_json_body_is_fetch_failure() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", WEATHER_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let summary = lightning_service(&server.url())
        .get_lightning_summary(None)
        .await;

    assert!(!summary.success);
    assert_eq!(summary.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
}
