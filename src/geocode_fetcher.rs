use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::fetch_error::FetchError;
use crate::fetcher::{json_client, read_json};
use crate::normalize::{RawGeoResponse, RawGeoResult};

const GEOCODE_USER_AGENT: &str = "Singapore Geocoding Tool/1.0";

/// OneMap search API client
#[derive(Clone)]
pub struct OneMapClient {
    client: reqwest::Client,
    url: String,
}

impl OneMapClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: json_client(GEOCODE_USER_AGENT, timeout)?,
            url,
        })
    }

    /// Search for a place and keep only the first hit.
    ///
    /// `Ok(None)` means the API answered but found nothing.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn search(&self, search_text: &str) -> Result<Option<RawGeoResult>, FetchError> {
        let query = [
            ("searchVal", search_text),
            ("returnGeom", "Y"),
            ("getAddrDetails", "Y"),
            ("pageNum", "1"),
        ];

        debug!("Sending HTTP request to OneMap");
        let response = self.client.get(&self.url).query(&query).send().await?;
        let payload: RawGeoResponse = read_json(response).await?;

        let found = payload.found.unwrap_or(0);
        let first = payload.into_first_result();
        info!("OneMap reported {} match(es) for '{}'", found, search_text);

        Ok(first)
    }
}
