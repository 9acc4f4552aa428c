use chrono::Utc;
use tracing::{debug, error, info, instrument};

use crate::bounds::{GeoBounds, GEOCODE_ADMIN_BOUNDS};
use crate::geocode_fetcher::OneMapClient;
use crate::normalize::{
    classify, lookup_known_location, normalize_lookup, prepare_search_text, GeoResult, QueryKind,
    RawGeoResult,
};

/// Resolves postal codes, addresses and building names to coordinates inside
/// Singapore. Well-known postal codes are answered from a built-in table.
#[derive(Clone)]
pub struct GeocodeService {
    client: OneMapClient,
    bounds: GeoBounds,
}

impl GeocodeService {
    pub fn new(client: OneMapClient) -> Self {
        Self {
            client,
            bounds: GEOCODE_ADMIN_BOUNDS,
        }
    }

    /// Classify a free-text query and geocode it along the matching path
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str) -> GeoResult {
        match classify(query) {
            Ok(kind) => {
                debug!("Query classified as {}", kind);
                self.geocode_as(query.trim(), kind).await
            }
            Err(failure) => GeoResult::failure(query, QueryKind::Unknown, &failure, Utc::now()),
        }
    }

    pub async fn geocode_postal_code(&self, postal_code: &str) -> GeoResult {
        self.geocode_as(postal_code, QueryKind::PostalCode).await
    }

    pub async fn geocode_address(&self, address: &str) -> GeoResult {
        self.geocode_as(address, QueryKind::Address).await
    }

    pub async fn geocode_building(&self, building_name: &str) -> GeoResult {
        self.geocode_as(building_name, QueryKind::Building).await
    }

    async fn geocode_as(&self, query: &str, kind: QueryKind) -> GeoResult {
        let search_text = match prepare_search_text(query, kind) {
            Ok(text) => text,
            Err(failure) => {
                info!("Rejected {} query '{}': {}", kind, query, failure);
                return GeoResult::failure(query, kind, &failure, Utc::now());
            }
        };

        let lookup = match lookup_known_location(&search_text) {
            Some(hit) => {
                debug!("Resolved '{}' from the built-in table", search_text);
                Some(hit)
            }
            None => self.search(&search_text).await,
        };

        let result = normalize_lookup(query, kind, lookup.as_ref(), &self.bounds, Utc::now());
        match result.coordinates() {
            Some((lat, lon)) => info!("Geocoded '{}' to ({:.6}, {:.6})", query, lat, lon),
            None => info!(
                "Could not geocode '{}': {}",
                query,
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }
        result
    }

    /// Transport failures are logged and treated as "no data"
    async fn search(&self, search_text: &str) -> Option<RawGeoResult> {
        match self.client.search(search_text).await {
            Ok(hit) => hit,
            Err(e) => {
                error!("OneMap search for '{}' failed: {}", search_text, e);
                None
            }
        }
    }
}
