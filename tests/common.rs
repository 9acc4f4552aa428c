#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lightning_tracker_service::api::AppState;
use lightning_tracker_service::fetcher::LightningFetcher;
use lightning_tracker_service::geocode_fetcher::OneMapClient;
use lightning_tracker_service::services::{GeocodeService, LightningService};
use lightning_tracker_service::snapshot::SnapshotStore;
use serde_json::{json, Value};

pub const WEATHER_PATH: &str = "/v2/real-time/api/weather";
pub const SEARCH_PATH: &str = "/commonapi/search";

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn lightning_service(server_url: &str) -> LightningService {
    let fetcher = LightningFetcher::new(format!("{server_url}{WEATHER_PATH}"), TEST_TIMEOUT)
        .expect("Failed to build lightning fetcher");
    LightningService::new(fetcher)
}

pub fn geocode_service(server_url: &str) -> GeocodeService {
    let client = OneMapClient::new(format!("{server_url}{SEARCH_PATH}"), TEST_TIMEOUT)
        .expect("Failed to build OneMap client");
    GeocodeService::new(client)
}

pub fn app_state(weather_url: &str, search_url: &str, snapshots: Arc<SnapshotStore>) -> AppState {
    AppState {
        lightning_service: lightning_service(weather_url),
        geocode_service: geocode_service(search_url),
        batch_delay: Duration::ZERO,
        snapshots,
    }
}

/// Three periods in delivery order:
/// - two ground/cloud strikes, one far outside Singapore
/// - no readings at all
/// - one unparseable reading and one good one
pub fn lightning_payload() -> Value {
    json!({
        "code": 0,
        "errorMsg": "",
        "data": {
            "paginationToken": "token-2",
            "records": [
                {
                    "datetime": "2024-01-15T14:30:00+08:00",
                    "updatedTimestamp": "2024-01-15T14:31:10+08:00",
                    "item": {
                        "isStationData": false,
                        "type": "observation",
                        "readings": [
                            {
                                "location": { "latitude": "1.3521", "longitude": "103.8198" },
                                "type": "G",
                                "text": "Cloud to Ground",
                                "datetime": "2024-01-15T14:29:41+08:00"
                            },
                            {
                                "location": { "latitude": "5.2000", "longitude": "100.4000" },
                                "type": "C",
                                "text": "Cloud to Cloud",
                                "datetime": "2024-01-15T14:29:55+08:00"
                            }
                        ]
                    }
                },
                {
                    "datetime": "2024-01-15T14:25:00+08:00",
                    "item": { "isStationData": false, "type": "observation", "readings": [] }
                },
                {
                    "datetime": "2024-01-15T14:35:00+08:00",
                    "item": {
                        "isStationData": false,
                        "type": "observation",
                        "readings": [
                            {
                                "location": { "latitude": "north", "longitude": "103.9" },
                                "type": "G"
                            },
                            {
                                "location": { "latitude": 1.41, "longitude": 103.95 },
                                "type": "G",
                                "text": "Cloud to Ground"
                            }
                        ]
                    }
                }
            ]
        }
    })
}

pub fn onemap_hit(address: &str, latitude: &str, longitude: &str) -> Value {
    json!({
        "found": 1,
        "totalNumPages": 1,
        "pageNum": 1,
        "results": [ {
            "SEARCHVAL": address,
            "BLK_NO": "1",
            "ROAD_NAME": "BEACH ROAD",
            "BUILDING": "RAFFLES HOTEL",
            "ADDRESS": address,
            "POSTAL": "189673",
            "LATITUDE": latitude,
            "LONGITUDE": longitude
        } ]
    })
}

pub fn onemap_empty() -> Value {
    json!({ "found": 0, "totalNumPages": 0, "pageNum": 1, "results": [] })
}
