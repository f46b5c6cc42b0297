//! GBFS response DTOs.
//!
//! Envelopes are typed so a feed that lost its `data` block is rejected as
//! a whole. Individual station objects stay as raw JSON values: one odd
//! field in one station must not sink the rest, so those are read field by
//! field in `convert`.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Body of the `station_status` feed.
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatusResponse {
    /// Feed generation time. Kept untyped; only numbers are used.
    #[serde(default)]
    pub last_updated: Option<Value>,

    /// Seconds the data stays fresh.
    #[serde(default)]
    pub ttl: Option<Value>,

    /// GBFS version string, e.g. "2.3".
    #[serde(default)]
    pub version: Option<String>,

    pub data: StationStatusData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationStatusData {
    pub stations: Vec<Value>,
}

/// Body of the `station_information` feed.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInformationResponse {
    #[serde(default)]
    pub last_updated: Option<Value>,

    pub data: StationInformationData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationInformationData {
    pub stations: Vec<Value>,
}

/// Body of the `gbfs.json` auto-discovery document.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryResponse {
    #[serde(default)]
    pub last_updated: Option<Value>,

    /// Feed lists keyed by language code.
    pub data: HashMap<String, LanguageFeeds>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageFeeds {
    pub feeds: Vec<FeedDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedDto {
    pub name: String,
    pub url: String,
}
