//! GBFS HTTP client.
//!
//! Issues one GET per call and converts the response to domain types.
//! Nothing is cached and nothing is retried.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{FeedInfo, Snapshot, StationDirectory};

use super::convert::{convert_feeds, convert_station_information, convert_station_status};
use super::error::FeedError;
use super::types::{DiscoveryResponse, StationInformationResponse, StationStatusResponse};

/// Default feed base URL: Barcelona's Bicing system, English feeds.
pub const DEFAULT_BASE_URL: &str = "https://barcelona.publicbikesystem.net/customer/gbfs/v2/en";

/// Default feed language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsConfig {
    /// Base URL of the per-language feeds (no trailing slash)
    pub base_url: String,
    /// Language whose feeds are listed by discovery
    pub language: String,
    /// Request timeout in seconds. `None` leaves the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl GbfsConfig {
    /// Create a config pointing at the default feed.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: None,
        }
    }

    /// Set a custom base URL (another system, or a stub server in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the discovery language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// URL of the `station_status` feed.
    pub fn station_status_url(&self) -> String {
        format!("{}/station_status", self.base_url)
    }

    /// URL of the `station_information` feed.
    pub fn station_information_url(&self) -> String {
        format!("{}/station_information", self.base_url)
    }

    /// URL of the `gbfs.json` discovery document.
    ///
    /// GBFS v2 publishes it one level above the per-language feeds, so a
    /// trailing `/{language}` segment is dropped from the base URL.
    pub fn discovery_url(&self) -> String {
        let suffix = format!("/{}", self.language);
        let root = self
            .base_url
            .strip_suffix(suffix.as_str())
            .unwrap_or(&self.base_url);
        format!("{root}/gbfs.json")
    }
}

impl Default for GbfsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// GBFS feed client.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
    config: GbfsConfig,
}

impl GbfsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GbfsConfig) -> Result<Self, FeedError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &GbfsConfig {
        &self.config
    }

    /// Fetch the current `station_status` feed.
    pub async fn fetch_station_status(&self) -> Result<Snapshot, FeedError> {
        let response: StationStatusResponse = self.get(&self.config.station_status_url()).await?;
        let snapshot = convert_station_status(&response);

        tracing::debug!(
            stations = snapshot.len(),
            last_updated = ?snapshot.last_updated,
            "fetched station status"
        );

        Ok(snapshot)
    }

    /// Fetch station names and locations from the `station_information` feed.
    pub async fn fetch_station_information(&self) -> Result<StationDirectory, FeedError> {
        let response: StationInformationResponse =
            self.get(&self.config.station_information_url()).await?;
        let directory = convert_station_information(&response);

        tracing::debug!(stations = directory.len(), "fetched station information");

        Ok(directory)
    }

    /// Fetch the feeds the system advertises for the configured language.
    pub async fn fetch_feeds(&self) -> Result<Vec<FeedInfo>, FeedError> {
        let response: DiscoveryResponse = self.get(&self.config.discovery_url()).await?;
        let feeds = convert_feeds(&response, &self.config.language)
            .map_err(|e| FeedError::schema(e.to_string()))?;

        tracing::debug!(feeds = feeds.len(), "fetched feed discovery");

        Ok(feeds)
    }

    /// GET a URL and decode its JSON body.
    ///
    /// A body that is not JSON is a [`FeedError::Json`]; JSON of the wrong
    /// shape is a [`FeedError::Schema`].
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        tracing::debug!(url, "GET");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let value: Value = serde_json::from_str(&body).map_err(|e| FeedError::json(&e, &body))?;

        serde_json::from_value(value).map_err(|e| FeedError::schema(e.to_string()))
    }
}
