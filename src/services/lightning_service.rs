use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::bounds::{GeoBounds, LIGHTNING_DISPLAY_BOUNDS};
use crate::fetcher::LightningFetcher;
use crate::normalize::{parse_observation_batch, ParsedSummary, StrikeRecord, TimeRange};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch lightning data from API";
pub const PARSE_FAILED_MESSAGE: &str = "Failed to parse lightning data";

/// Response shape of every lightning request, successful or not.
///
/// On failure `success` is false, `error` is set and the data fields are empty.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LightningSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub coordinates: Vec<StrikeRecord>,
    pub total_strikes: usize,
    pub records_with_lightning: usize,
    pub time_range: TimeRange,
    pub timestamp: DateTime<Utc>,
    pub bounds: GeoBounds,
    pub raw_period_count: usize,
    /// Strikes inside the display box; informational, nothing is filtered
    pub strikes_within_bounds: usize,
    pub pagination_token: Option<String>,
}

impl LightningSummary {
    pub fn failure(message: impl Into<String>, bounds: GeoBounds, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            coordinates: Vec::new(),
            total_strikes: 0,
            records_with_lightning: 0,
            time_range: TimeRange::default(),
            timestamp,
            bounds,
            raw_period_count: 0,
            strikes_within_bounds: 0,
            pagination_token: None,
        }
    }

    pub fn from_parsed(parsed: ParsedSummary, bounds: GeoBounds, timestamp: DateTime<Utc>) -> Self {
        let coordinates: Vec<StrikeRecord> = parsed.strikes().cloned().collect();
        let strikes_within_bounds =
            bounds.count_within(coordinates.iter().map(|s| (s.latitude, s.longitude)));

        Self {
            success: true,
            error: None,
            total_strikes: parsed.total_strikes,
            records_with_lightning: parsed.records_with_lightning,
            time_range: parsed.time_range,
            timestamp,
            bounds,
            raw_period_count: parsed.total_periods,
            strikes_within_bounds,
            pagination_token: parsed.pagination_token,
            coordinates,
        }
    }
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
pub fn is_valid_date_filter(value: &str) -> bool {
    match value.len() {
        10 => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        19 => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok(),
        _ => false,
    }
}

#[derive(Clone)]
pub struct LightningService {
    fetcher: LightningFetcher,
    bounds: GeoBounds,
}

impl LightningService {
    pub fn new(fetcher: LightningFetcher) -> Self {
        Self {
            fetcher,
            bounds: LIGHTNING_DISPLAY_BOUNDS,
        }
    }

    /// Fetch, normalize and summarize the current lightning observations.
    ///
    /// Never fails: every error is reported through the returned summary.
    #[instrument(skip(self))]
    pub async fn get_lightning_summary(&self, date: Option<&str>) -> LightningSummary {
        if let Some(date) = date {
            if !is_valid_date_filter(date) {
                warn!("Rejecting date filter '{}'", date);
                return LightningSummary::failure(
                    format!("Invalid date filter '{date}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"),
                    self.bounds,
                    Utc::now(),
                );
            }
        }

        let raw = match self.fetcher.fetch_observations(date).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Lightning fetch failed (timeout: {}): {}", e.is_timeout(), e);
                return LightningSummary::failure(FETCH_FAILED_MESSAGE, self.bounds, Utc::now());
            }
        };

        let parsed = match parse_observation_batch(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Lightning payload rejected: {}", e);
                return LightningSummary::failure(
                    format!("{PARSE_FAILED_MESSAGE}: {e}"),
                    self.bounds,
                    Utc::now(),
                );
            }
        };

        let summary = LightningSummary::from_parsed(parsed, self.bounds, Utc::now());

        info!(
            "Lightning summary: {} strikes in {} of {} periods, {} within display bounds",
            summary.total_strikes,
            summary.records_with_lightning,
            summary.raw_period_count,
            summary.strikes_within_bounds
        );
        if summary.strikes_within_bounds < summary.coordinates.len() {
            warn!(
                "{} strikes fall outside the display bounds",
                summary.coordinates.len() - summary.strikes_within_bounds
            );
        }

        summary
    }
}
