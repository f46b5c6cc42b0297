//! A fetched station-status snapshot and the queries over it.

use chrono::{DateTime, Utc};

use super::station::StationStatusRecord;
use super::time::unix_seconds_to_utc;

/// Every station's status as of one feed response.
///
/// Fetch once, query many times. Queries never touch the network, so all
/// answers from one snapshot agree with each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Stations in feed order.
    pub stations: Vec<StationStatusRecord>,

    /// Feed generation time in Unix seconds, when the feed sent one.
    pub last_updated: Option<f64>,
}

/// Aggregate availability figures for a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSummary {
    pub station_count: usize,
    pub operational_count: usize,
    pub total_bikes: u64,
    pub total_docks: u64,
    /// Fewest bikes at any one station; `None` when there are no stations.
    pub min_bikes: Option<u32>,
    /// Most bikes at any one station; `None` when there are no stations.
    pub max_bikes: Option<u32>,
    /// Mean bikes per station; `None` when there are no stations.
    pub mean_bikes: Option<f64>,
}

impl Snapshot {
    pub fn new(stations: Vec<StationStatusRecord>, last_updated: Option<f64>) -> Self {
        Self {
            stations,
            last_updated,
        }
    }

    /// Split into the `(stations, last_updated)` pair.
    pub fn into_parts(self) -> (Vec<StationStatusRecord>, Option<f64>) {
        (self.stations, self.last_updated)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Feed generation time as a calendar time.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated.and_then(unix_seconds_to_utc)
    }

    /// First station with the given id.
    pub fn find_by_id(&self, station_id: &str) -> Option<&StationStatusRecord> {
        self.stations.iter().find(|s| s.station_id == station_id)
    }

    /// Operational stations, in feed order.
    pub fn operational(&self) -> impl Iterator<Item = &StationStatusRecord> {
        self.stations.iter().filter(|s| s.is_operational())
    }

    /// Stations with at least `min_bikes` bikes available, in feed order.
    pub fn with_min_bikes(&self, min_bikes: u32) -> impl Iterator<Item = &StationStatusRecord> {
        self.stations
            .iter()
            .filter(move |s| s.has_min_bikes(min_bikes))
    }

    /// The `n` stations with the most bikes available.
    ///
    /// Stations with equal counts keep their feed order.
    pub fn top_by_bikes(&self, n: usize) -> Vec<&StationStatusRecord> {
        let mut ranked: Vec<&StationStatusRecord> = self.stations.iter().collect();
        ranked.sort_by(|a, b| b.bikes_available.cmp(&a.bikes_available));
        ranked.truncate(n);
        ranked
    }

    pub fn summary(&self) -> SnapshotSummary {
        let bikes = self.stations.iter().map(|s| s.bikes_available);
        let total_bikes: u64 = bikes.clone().map(u64::from).sum();

        let mean_bikes = if self.stations.is_empty() {
            None
        } else {
            Some(total_bikes as f64 / self.stations.len() as f64)
        };

        SnapshotSummary {
            station_count: self.stations.len(),
            operational_count: self.operational().count(),
            total_bikes,
            total_docks: self
                .stations
                .iter()
                .map(|s| u64::from(s.docks_available))
                .sum(),
            min_bikes: bikes.clone().min(),
            max_bikes: bikes.max(),
            mean_bikes,
        }
    }
}
