use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::normalize::GeoResult;
use crate::services::GeocodeService;

/// Per-query results in input order, plus success/failure counts
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchReport {
    pub results: Vec<GeoResult>,
    pub successful: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn from_results(results: Vec<GeoResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        Self {
            results,
            successful,
            failed,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Percentage of successful queries, 0.0 for an empty batch
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            self.successful as f64 / self.results.len() as f64 * 100.0
        }
    }
}

/// Geocodes a list of queries one at a time with a fixed pause between calls.
///
/// A failed query never stops the batch.
#[derive(Clone)]
pub struct BatchRunner {
    geocoder: GeocodeService,
    delay: Duration,
}

impl BatchRunner {
    pub fn new(geocoder: GeocodeService, delay: Duration) -> Self {
        Self { geocoder, delay }
    }

    #[instrument(skip(self, queries), fields(count = queries.len(), delay_ms = self.delay.as_millis() as u64))]
    pub async fn run(&self, queries: &[String]) -> BatchReport {
        self.run_with_progress(queries, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_result` after each query
    pub async fn run_with_progress<F>(&self, queries: &[String], mut on_result: F) -> BatchReport
    where
        F: FnMut(usize, &GeoResult),
    {
        info!("Batch geocoding {} queries", queries.len());
        let mut results = Vec::with_capacity(queries.len());

        for (i, query) in queries.iter().enumerate() {
            info!("Processing {}/{}: {}", i + 1, queries.len(), query);
            let result = self.geocoder.geocode(query).await;
            on_result(i, &result);
            results.push(result);

            // No pause after the last query
            if i + 1 < queries.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let report = BatchReport::from_results(results);
        info!(
            "Batch geocoding completed: {}/{} successful ({:.1}%), {} failed",
            report.successful,
            report.total(),
            report.success_rate(),
            report.failed
        );
        report
    }
}
