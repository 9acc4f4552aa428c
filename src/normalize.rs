// Response normalization
//
// Pure functions that turn loosely-typed upstream JSON into validated records:
// - lightning: NEA real-time lightning observations -> ParsedSummary
// - geocode: OneMap search results (or the built-in table) -> GeoResult
//
// Nothing in here performs I/O or reads the clock.

pub mod error;
pub mod geocode;
pub mod lightning;

pub use error::{CoordinateError, NormalizeError};
pub use geocode::{
    classify, extract_coordinates, lookup_known_location, normalize_lookup, prepare_search_text,
    GeoResult, GeocodeFailure, QueryKind, RawGeoResponse, RawGeoResult,
};
pub use lightning::{
    parse_observation_batch, ObservationPeriod, ParsedSummary, RawObservationBatch, StrikeRecord,
    TimeRange,
};

use serde_json::Value;

/// Coerce a latitude/longitude value that may arrive as a JSON number or as a
/// numeric string. Missing, null, non-numeric and non-finite values fail.
pub fn coerce_coordinate(field: &'static str, value: Option<&Value>) -> Result<f64, CoordinateError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(CoordinateError::Unparseable {
            field,
            value: value.map_or_else(|| "<missing>".to_string(), Value::to_string),
        }),
    }
}
