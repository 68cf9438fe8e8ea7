//! HTTP client for the Meteomatics weather API

use super::query::{GridQuery, ResponseFormat, TimeseriesQuery};
use crate::config::MeteomaticsConfig;
use crate::models::RawPayload;
use crate::{Result, ViabilityError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, info, instrument};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Body and content type of an API response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.to_lowercase().contains("application/json")
    }
}

/// Meteomatics API client
pub struct MeteomaticsClient {
    client: Client,
    config: MeteomaticsConfig,
}

impl MeteomaticsClient {
    /// Create a new client from configuration
    pub fn new(config: MeteomaticsConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("viability/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ViabilityError::api(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &MeteomaticsConfig {
        &self.config
    }

    /// Full URL for a request path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET a path relative to the base URL
    #[instrument(skip(self))]
    pub async fn get_raw(&self, path: &str) -> Result<RawResponse> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(username) = &self.config.username {
            request = request.basic_auth(username, self.config.password.as_deref());
        }

        let response = request.send().await.map_err(|e| {
            ViabilityError::api(format!("error connecting to Meteomatics: {e}"))
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ViabilityError::api(format!(
                "Meteomatics returned {status}: {body}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ViabilityError::api(format!("failed to read response body: {e}")))?
            .to_vec();

        debug!("Received {} bytes ({})", bytes.len(), content_type);
        Ok(RawResponse {
            bytes,
            content_type,
        })
    }

    /// Fetch a point timeseries
    pub async fn timeseries(&self, query: &TimeseriesQuery) -> Result<RawResponse> {
        self.get_raw(&query.path()?).await
    }

    /// Fetch a raster grid
    pub async fn grid(&self, query: &GridQuery) -> Result<RawResponse> {
        self.get_raw(&query.path()?).await
    }

    /// Fetch the year of samples the analysis needs for one location
    #[instrument(skip(self))]
    pub async fn fetch_annual_payload(
        &self,
        lat: f64,
        lon: f64,
        now: DateTime<Utc>,
    ) -> Result<RawPayload> {
        let query = TimeseriesQuery::annual(lat, lon, now, &self.config)?;
        info!(
            "Fetching {} to {} for ({:.4}, {:.4})",
            query.start, query.end, lat, lon
        );

        let response = self.timeseries(&query).await?;
        decode_payload(&response)
    }
}

/// Decode a JSON timeseries response
pub fn decode_payload(response: &RawResponse) -> Result<RawPayload> {
    if !response.is_json() {
        return Err(ViabilityError::input(format!(
            "expected {} response, got {}",
            ResponseFormat::Json,
            response.content_type
        )));
    }
    RawPayload::from_json_slice(&response.bytes)
}
