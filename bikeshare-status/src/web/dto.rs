//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    FeedInfo, Snapshot, SnapshotSummary, StationDirectory, StationStatusRecord, VehicleTypeCount,
};

/// Query for stations with a minimum number of bikes.
#[derive(Debug, Deserialize)]
pub struct AvailableStationsRequest {
    /// Minimum bikes available (defaults to 1)
    pub min_bikes: Option<u32>,
}

/// A station in API responses.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StationResult {
    pub station_id: String,

    /// Name from `station_information`, when the system publishes one
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// `IN_SERVICE`, `MAINTENANCE` or `OUT_OF_SERVICE`
    pub status: String,

    pub bikes_available: u32,
    pub bikes_disabled: u32,
    pub docks_available: u32,
    pub is_renting: bool,
    pub is_returning: bool,

    /// Whether the station is in service and both renting and returning
    pub is_operational: bool,

    /// Last report time, Unix seconds
    pub last_reported: Option<f64>,

    /// Per-type availability in feed order
    pub vehicle_types: Vec<VehicleTypeResult>,

    /// Available vehicles keyed by type
    pub bikes_by_type: BTreeMap<String, u32>,
}

impl StationResult {
    /// Build a result, labelled from `directory` when it knows the station.
    pub fn from_record(record: &StationStatusRecord, directory: &StationDirectory) -> Self {
        let info = directory.get(&record.station_id);

        Self {
            station_id: record.station_id.clone(),
            name: directory.name_of(&record.station_id).map(str::to_string),
            lat: info.and_then(|i| i.lat),
            lon: info.and_then(|i| i.lon),
            status: record.status.as_str().to_string(),
            bikes_available: record.bikes_available,
            bikes_disabled: record.bikes_disabled,
            docks_available: record.docks_available,
            is_renting: record.is_renting,
            is_returning: record.is_returning,
            is_operational: record.is_operational(),
            last_reported: record.last_reported,
            vehicle_types: record
                .vehicle_types
                .iter()
                .map(VehicleTypeResult::from_count)
                .collect(),
            bikes_by_type: record.bikes_by_type(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VehicleTypeResult {
    pub vehicle_type_id: String,
    pub count: u32,
}

impl VehicleTypeResult {
    fn from_count(vt: &VehicleTypeCount) -> Self {
        Self {
            vehicle_type_id: vt.vehicle_type_id.clone(),
            count: vt.count,
        }
    }
}

/// Response for station list endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct StationListResponse {
    /// Feed generation time, Unix seconds
    pub last_updated: Option<f64>,

    /// Feed generation time, RFC 3339
    pub last_updated_at: Option<String>,

    pub count: usize,
    pub stations: Vec<StationResult>,
}

impl StationListResponse {
    /// Build a response from a snapshot and the stations selected from it.
    pub fn new<'a>(
        snapshot: &Snapshot,
        directory: &StationDirectory,
        stations: impl IntoIterator<Item = &'a StationStatusRecord>,
    ) -> Self {
        let stations: Vec<StationResult> = stations
            .into_iter()
            .map(|s| StationResult::from_record(s, directory))
            .collect();

        Self {
            last_updated: snapshot.last_updated,
            last_updated_at: snapshot.last_updated_at().map(|t| t.to_rfc3339()),
            count: stations.len(),
            stations,
        }
    }
}

/// Response for the summary endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub last_updated: Option<f64>,
    pub station_count: usize,
    pub operational_count: usize,
    pub total_bikes: u64,
    pub total_docks: u64,
    pub min_bikes: Option<u32>,
    pub max_bikes: Option<u32>,
    pub mean_bikes: Option<f64>,
}

impl SummaryResponse {
    pub fn new(last_updated: Option<f64>, summary: SnapshotSummary) -> Self {
        Self {
            last_updated,
            station_count: summary.station_count,
            operational_count: summary.operational_count,
            total_bikes: summary.total_bikes,
            total_docks: summary.total_docks,
            min_bikes: summary.min_bikes,
            max_bikes: summary.max_bikes,
            mean_bikes: summary.mean_bikes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResult {
    pub name: String,
    pub url: String,
}

impl From<FeedInfo> for FeedResult {
    fn from(feed: FeedInfo) -> Self {
        Self {
            name: feed.name,
            url: feed.url,
        }
    }
}

/// Response for the feed discovery endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedListResponse {
    pub language: String,
    pub feeds: Vec<FeedResult>,
}

/// Response for `/ip`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IpResponse {
    pub ip: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
