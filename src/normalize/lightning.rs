/// NEA lightning observation normalizer
///
/// The real-time weather API wraps lightning detections in time periods:
///
/// ```text
/// { "code": 0, "errorMsg": "", "data": { "paginationToken": "...", "records": [
///     { "datetime": "...", "updatedTimestamp": "...",
///       "item": { "isStationData": false, "type": "observation", "readings": [
///           { "location": { "latitude": "1.29", "longitude": "103.85" },
///             "type": "G", "text": "Cloud to Ground", "datetime": "..." } ] } } ] } }
/// ```
///
/// A period with no readings is valid. A reading that is not an object, or whose
/// coordinates do not coerce to numbers, is dropped on its own without affecting
/// its siblings. Other fields of the wrong type fall back to their defaults.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use super::{coerce_coordinate, CoordinateError, NormalizeError};

/// Status code the API uses for a successful response
pub const SUCCESS_CODE: i64 = 0;

const DEFAULT_READING_TYPE: &str = "Unknown";
const DEFAULT_READING_DESCRIPTION: &str = "Unknown";
const DEFAULT_OBSERVATION_TYPE: &str = "unknown";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservationBatch {
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub error_msg: Option<String>,
    pub data: Option<RawObservationData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservationData {
    /// Periods stay untyped until normalization so one bad entry is skipped alone
    #[serde(default, deserialize_with = "lenient")]
    pub records: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub pagination_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimePeriod {
    #[serde(default, deserialize_with = "lenient")]
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub item: Option<RawPeriodItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPeriodItem {
    #[serde(default, deserialize_with = "lenient")]
    pub is_station_data: Option<bool>,
    #[serde(rename = "type", default, deserialize_with = "scalar_text")]
    pub observation_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub readings: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReading {
    /// Kept untyped so a malformed location only drops this reading
    pub location: Option<Value>,
    #[serde(rename = "type", default, deserialize_with = "scalar_text")]
    pub strike_type: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub datetime: Option<String>,
}

/// A field of the wrong JSON type reads as absent instead of failing the payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like [`lenient`], but numbers and booleans are kept as their text.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// One lightning detection with coerced coordinates
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StrikeRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Strike type code, e.g. "G" (cloud to ground) or "C" (cloud to cloud)
    #[serde(rename = "type")]
    pub strike_type: String,
    pub description: String,
    /// Timestamp of the individual reading
    pub datetime: Option<String>,
    /// Timestamp of the period the reading was reported in
    pub record_datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ObservationPeriod {
    pub datetime: Option<String>,
    pub updated_timestamp: Option<String>,
    pub is_station_data: bool,
    pub observation_type: String,
    /// Readings delivered by the API, including any that were dropped
    pub readings_count: usize,
    pub readings: Vec<StrikeRecord>,
}

/// Earliest and latest period timestamp, compared as strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct TimeRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSummary {
    pub total_periods: usize,
    pub records_with_lightning: usize,
    pub total_strikes: usize,
    pub time_range: TimeRange,
    pub pagination_token: Option<String>,
    pub records: Vec<ObservationPeriod>,
}

impl ParsedSummary {
    /// All accepted strikes in API delivery order
    pub fn strikes(&self) -> impl Iterator<Item = &StrikeRecord> {
        self.records.iter().flat_map(|period| period.readings.iter())
    }
}

/// Validate the top-level status of a batch and normalize every period in it.
#[instrument(skip(raw), fields(code = ?raw.code))]
pub fn parse_observation_batch(raw: &RawObservationBatch) -> Result<ParsedSummary, NormalizeError> {
    if raw.code != Some(SUCCESS_CODE) {
        warn!(
            "Invalid or error response from API: code={:?}, message={:?}",
            raw.code, raw.error_msg
        );
        return Err(NormalizeError::InvalidResponse {
            code: raw.code,
            message: raw.error_msg.clone(),
        });
    }

    let data = raw.data.as_ref();
    let periods = data.and_then(|d| d.records.as_deref()).unwrap_or_default();
    let pagination_token = data.and_then(|d| d.pagination_token.clone());

    debug!("Processing {} time period records", periods.len());

    let mut records = Vec::with_capacity(periods.len());
    let mut records_with_lightning = 0;
    let mut total_strikes = 0;

    for value in periods {
        let period = match RawTimePeriod::deserialize(value) {
            Ok(period) => period,
            Err(e) => {
                warn!("Skipping malformed time period {}: {}", value, e);
                continue;
            }
        };
        let normalized = normalize_period(&period);

        if !normalized.readings.is_empty() {
            records_with_lightning += 1;
            total_strikes += normalized.readings.len();
            debug!(
                "Found {} lightning strikes at {:?}",
                normalized.readings.len(),
                normalized.datetime
            );
        }

        records.push(normalized);
    }

    let time_range = time_range(&records);

    info!(
        "Parsed {} periods, {} with lightning, {} strikes",
        records.len(),
        records_with_lightning,
        total_strikes
    );

    Ok(ParsedSummary {
        total_periods: records.len(),
        records_with_lightning,
        total_strikes,
        time_range,
        pagination_token,
        records,
    })
}

fn normalize_period(period: &RawTimePeriod) -> ObservationPeriod {
    let item = period.item.as_ref();
    let raw_readings = item.and_then(|i| i.readings.as_deref()).unwrap_or_default();

    let mut readings = Vec::with_capacity(raw_readings.len());
    let mut skipped = 0;

    for value in raw_readings {
        let reading = match RawReading::deserialize(value) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Skipping malformed reading {}: {}", value, e);
                skipped += 1;
                continue;
            }
        };
        match normalize_reading(&reading, period.datetime.as_deref()) {
            Ok(strike) => readings.push(strike),
            Err(e) => {
                warn!("Skipping reading with invalid coordinates: {} ({:?})", e, reading.location);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} of {} readings at {:?}",
            skipped,
            raw_readings.len(),
            period.datetime
        );
    }

    ObservationPeriod {
        datetime: period.datetime.clone(),
        updated_timestamp: period.updated_timestamp.clone(),
        is_station_data: item.and_then(|i| i.is_station_data).unwrap_or(false),
        observation_type: item
            .and_then(|i| i.observation_type.clone())
            .unwrap_or_else(|| DEFAULT_OBSERVATION_TYPE.to_string()),
        readings_count: raw_readings.len(),
        readings,
    }
}

fn normalize_reading(
    reading: &RawReading,
    record_datetime: Option<&str>,
) -> Result<StrikeRecord, CoordinateError> {
    let location = reading.location.as_ref();
    let latitude = coerce_coordinate("latitude", location.and_then(|l| l.get("latitude")))?;
    let longitude = coerce_coordinate("longitude", location.and_then(|l| l.get("longitude")))?;

    Ok(StrikeRecord {
        latitude,
        longitude,
        strike_type: reading
            .strike_type
            .clone()
            .unwrap_or_else(|| DEFAULT_READING_TYPE.to_string()),
        description: reading
            .text
            .clone()
            .unwrap_or_else(|| DEFAULT_READING_DESCRIPTION.to_string()),
        datetime: reading.datetime.clone(),
        record_datetime: record_datetime.map(str::to_string),
    })
}

// Plain string ordering, so this is only chronological when every period
// timestamp uses the same offset notation.
fn time_range(records: &[ObservationPeriod]) -> TimeRange {
    let timestamps = records
        .iter()
        .filter_map(|r| r.datetime.as_deref())
        .filter(|ts| !ts.is_empty());

    let mut range = TimeRange::default();
    for ts in timestamps {
        if range.earliest.as_deref().map_or(true, |e| ts < e) {
            range.earliest = Some(ts.to_string());
        }
        if range.latest.as_deref().map_or(true, |l| ts > l) {
            range.latest = Some(ts.to_string());
        }
    }
    range
}
