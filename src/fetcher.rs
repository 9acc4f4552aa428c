use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, error, instrument};

use crate::fetch_error::FetchError;
use crate::normalize::RawObservationBatch;

const LIGHTNING_USER_AGENT: &str = "Lightning Detection System/1.0";

/// Build a client with the JSON headers and single timeout shared by both
/// upstream APIs.
pub(crate) fn json_client(user_agent: &'static str, timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Read a response body as JSON of the expected shape.
///
/// Non-2xx statuses become [`FetchError::Status`]; bodies that are not the
/// expected JSON become [`FetchError::MalformedPayload`].
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, FetchError> {
    let status = response.status();
    debug!("Received HTTP response with status: {}", status);
    if !status.is_success() {
        error!("Upstream returned non-success status {}", status);
        return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    debug!("Retrieved response body, size: {} bytes", body.len());

    serde_json::from_str(&body).map_err(|e| {
        error!("Response body is not the expected JSON: {}", e);
        debug!(
            "Body preview (first 200 chars): {}",
            body.chars().take(200).collect::<String>()
        );
        FetchError::MalformedPayload(e.to_string())
    })
}

/// Real-time weather API client, lightning dataset only
#[derive(Clone)]
pub struct LightningFetcher {
    client: reqwest::Client,
    url: String,
}

impl LightningFetcher {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: json_client(LIGHTNING_USER_AGENT, timeout)?,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET for the lightning dataset, optionally filtered to a date or
    /// date-time. The filter is forwarded as-is.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_observations(
        &self,
        date: Option<&str>,
    ) -> Result<RawObservationBatch, FetchError> {
        let mut query: Vec<(&str, &str)> = vec![("api", "lightning")];
        if let Some(date) = date {
            query.push(("date", date));
        }

        debug!("Sending HTTP request to lightning API");
        let response = self.client.get(&self.url).query(&query).send().await?;

        read_json(response).await
    }
}
