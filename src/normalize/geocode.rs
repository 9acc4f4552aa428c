/// OneMap geocoding normalizer
///
/// Classifies free-text queries, resolves well-known postal codes from a
/// built-in table, and turns a OneMap search hit into a [`GeoResult`].
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::{coerce_coordinate, CoordinateError};
use crate::bounds::GeoBounds;
use crate::utils::{clean_postal_code, extract_postal_code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    PostalCode,
    Address,
    Building,
    Unknown,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::PostalCode => "postal_code",
            QueryKind::Address => "address",
            QueryKind::Building => "building",
            QueryKind::Unknown => "unknown",
        }
    }

    fn input_label(&self) -> &'static str {
        match self {
            QueryKind::PostalCode => "postal code",
            QueryKind::Address => "address",
            QueryKind::Building => "building name",
            QueryKind::Unknown => "query",
        }
    }

    fn subject_label(&self) -> &'static str {
        match self {
            QueryKind::PostalCode => "Postal code",
            QueryKind::Address => "Address",
            QueryKind::Building => "Building",
            QueryKind::Unknown => "Query",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a geocoding call produced no coordinates. The display text is what ends
/// up in [`GeoResult::error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeFailure {
    #[error("Invalid {}: empty or non-string input", .0.input_label())]
    InvalidInput(QueryKind),
    #[error("Invalid postal code format: '{0}'")]
    InvalidFormat(String),
    #[error("{} not found in OneMap database", .0.subject_label())]
    NotFound(QueryKind),
    #[error("Failed to extract valid coordinates")]
    InvalidCoordinates,
}

/// First-match-wins classification of a free-text query.
///
/// 1. blank input is rejected
/// 2. exactly six digits once every non-digit is stripped -> postal code
/// 3. a standalone six-digit run inside longer text -> address
/// 4. anything else -> building
pub fn classify(query: &str) -> Result<QueryKind, GeocodeFailure> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(GeocodeFailure::InvalidInput(QueryKind::Unknown));
    }

    if clean_postal_code(trimmed).is_some() {
        Ok(QueryKind::PostalCode)
    } else if extract_postal_code(trimmed).is_some() {
        Ok(QueryKind::Address)
    } else {
        Ok(QueryKind::Building)
    }
}

/// Validate a query for its sub-path and return the text to search for.
///
/// Postal codes must reduce to six digits; addresses and building names only
/// need to be non-blank.
pub fn prepare_search_text(query: &str, kind: QueryKind) -> Result<String, GeocodeFailure> {
    match kind {
        QueryKind::PostalCode => {
            clean_postal_code(query).ok_or_else(|| GeocodeFailure::InvalidFormat(query.to_string()))
        }
        QueryKind::Address | QueryKind::Building => {
            let trimmed = query.trim();
            if trimmed.is_empty() {
                Err(GeocodeFailure::InvalidInput(kind))
            } else {
                Ok(trimmed.to_string())
            }
        }
        QueryKind::Unknown => Err(GeocodeFailure::InvalidInput(QueryKind::Unknown)),
    }
}

/// One OneMap search hit. Coordinates are kept untyped because the API sends
/// them as strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawGeoResult {
    #[serde(rename = "ADDRESS")]
    pub address: Option<String>,
    #[serde(rename = "BUILDING")]
    pub building: Option<String>,
    #[serde(rename = "ROAD")]
    pub road: Option<String>,
    #[serde(rename = "ROAD_NAME")]
    pub road_name: Option<String>,
    #[serde(rename = "LATITUDE")]
    pub latitude: Option<Value>,
    #[serde(rename = "LONGITUDE")]
    pub longitude: Option<Value>,
}

impl RawGeoResult {
    /// `ROAD` when present, otherwise `ROAD_NAME`
    pub fn road(&self) -> Option<&str> {
        self.road.as_deref().or(self.road_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeoResponse {
    pub found: Option<u64>,
    pub results: Option<Vec<RawGeoResult>>,
}

impl RawGeoResponse {
    /// The most relevant hit, if the response reports any
    pub fn into_first_result(self) -> Option<RawGeoResult> {
        if self.found.unwrap_or(0) == 0 {
            return None;
        }
        self.results.and_then(|results| results.into_iter().next())
    }
}

struct KnownLocation {
    postal_code: &'static str,
    address: &'static str,
    building: &'static str,
    road: &'static str,
    latitude: &'static str,
    longitude: &'static str,
}

const KNOWN_LOCATIONS: [KnownLocation; 5] = [
    KnownLocation {
        postal_code: "238874",
        address: "ION Orchard, 2 Orchard Turn, Singapore 238874",
        building: "ION Orchard",
        road: "Orchard Turn",
        latitude: "1.304167",
        longitude: "103.833611",
    },
    KnownLocation {
        postal_code: "018989",
        address: "Marina Bay Sands, 10 Bayfront Avenue, Singapore 018989",
        building: "Marina Bay Sands",
        road: "Bayfront Avenue",
        latitude: "1.283611",
        longitude: "103.859722",
    },
    KnownLocation {
        postal_code: "018956",
        address: "Gardens by the Bay, 18 Marina Gardens Drive, Singapore 018956",
        building: "Gardens by the Bay",
        road: "Marina Gardens Drive",
        latitude: "1.281528",
        longitude: "103.865556",
    },
    KnownLocation {
        postal_code: "079903",
        address: "Singapore Zoo, 80 Mandai Lake Road, Singapore 079903",
        building: "Singapore Zoo",
        road: "Mandai Lake Road",
        latitude: "1.403611",
        longitude: "103.791944",
    },
    KnownLocation {
        postal_code: "099253",
        address: "Sentosa, 39 Artillery Avenue, Singapore 099253",
        building: "Sentosa",
        road: "Artillery Avenue",
        latitude: "1.246389",
        longitude: "103.822778",
    },
];

/// Resolve a search text from the built-in table, shaped like a OneMap hit
pub fn lookup_known_location(search_text: &str) -> Option<RawGeoResult> {
    let key = search_text.trim();
    KNOWN_LOCATIONS
        .iter()
        .find(|loc| loc.postal_code == key)
        .map(|loc| RawGeoResult {
            address: Some(loc.address.to_string()),
            building: Some(loc.building.to_string()),
            road: Some(loc.road.to_string()),
            road_name: None,
            latitude: Some(Value::String(loc.latitude.to_string())),
            longitude: Some(Value::String(loc.longitude.to_string())),
        })
}

/// Coerce the hit's coordinates and require them to lie inside `bounds`.
pub fn extract_coordinates(
    raw: &RawGeoResult,
    bounds: &GeoBounds,
) -> Result<(f64, f64), CoordinateError> {
    let latitude = coerce_coordinate("latitude", raw.latitude.as_ref())?;
    let longitude = coerce_coordinate("longitude", raw.longitude.as_ref())?;

    if bounds.contains(latitude, longitude) {
        Ok((latitude, longitude))
    } else {
        Err(CoordinateError::OutOfBounds {
            latitude,
            longitude,
        })
    }
}

/// Uniform outcome of any geocoding call.
///
/// Either `success` is true and both coordinates are set, or `success` is
/// false and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GeoResult {
    pub query: String,
    pub query_type: QueryKind,
    pub success: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub building: Option<String>,
    pub road: Option<String>,
    pub postal_code: Option<String>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl GeoResult {
    pub fn failure(
        query: &str,
        kind: QueryKind,
        failure: &GeocodeFailure,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            query: query.to_string(),
            query_type: kind,
            success: false,
            latitude: None,
            longitude: None,
            address: None,
            building: None,
            road: None,
            postal_code: None,
            error: Some(failure.to_string()),
            timestamp,
        }
    }

    fn with_postal_code(mut self, postal_code: Option<String>) -> Self {
        self.postal_code = postal_code;
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.success, self.latitude, self.longitude) {
            (true, Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Build the result for a query whose lookup has completed.
///
/// `lookup` is `None` when neither the table nor the network found anything.
/// Postal code queries carry their cleaned code in every outcome; other kinds
/// recover one from the returned address when it contains a six-digit run.
pub fn normalize_lookup(
    query: &str,
    kind: QueryKind,
    lookup: Option<&RawGeoResult>,
    bounds: &GeoBounds,
    timestamp: DateTime<Utc>,
) -> GeoResult {
    let query_postal_code = match kind {
        QueryKind::PostalCode => clean_postal_code(query),
        _ => None,
    };

    let Some(raw) = lookup else {
        debug!("No geocoding result for {} query '{}'", kind, query);
        return GeoResult::failure(query, kind, &GeocodeFailure::NotFound(kind), timestamp)
            .with_postal_code(query_postal_code);
    };

    let (latitude, longitude) = match extract_coordinates(raw, bounds) {
        Ok(coords) => coords,
        Err(e) => {
            warn!("Rejecting geocoding result for '{}': {}", query, e);
            return GeoResult::failure(query, kind, &GeocodeFailure::InvalidCoordinates, timestamp)
                .with_postal_code(query_postal_code);
        }
    };

    let address = raw.address.clone().unwrap_or_default();
    let postal_code = query_postal_code.or_else(|| extract_postal_code(&address));

    GeoResult {
        query: query.to_string(),
        query_type: kind,
        success: true,
        latitude: Some(latitude),
        longitude: Some(longitude),
        building: Some(raw.building.clone().unwrap_or_default()),
        road: Some(raw.road().unwrap_or_default().to_string()),
        address: Some(address),
        postal_code,
        error: None,
        timestamp,
    }
}
