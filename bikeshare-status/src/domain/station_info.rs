//! Static station details from the `station_information` feed.

use std::collections::HashMap;

/// Name and location of one station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationInfo {
    pub station_id: String,

    /// Public station name; empty when the feed omits it.
    pub name: String,

    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Total docking points, when published.
    pub capacity: Option<u32>,
}

/// Station details indexed by station id.
///
/// Used to label status records, which carry only an id. When the feed
/// lists an id more than once, the first entry is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationDirectory {
    by_id: HashMap<String, StationInfo>,
}

impl StationDirectory {
    pub fn new(stations: impl IntoIterator<Item = StationInfo>) -> Self {
        let mut by_id = HashMap::new();
        for info in stations {
            by_id.entry(info.station_id.clone()).or_insert(info);
        }
        Self { by_id }
    }

    pub fn get(&self, station_id: &str) -> Option<&StationInfo> {
        self.by_id.get(station_id)
    }

    /// The station's name, if the directory has a non-empty one.
    pub fn name_of(&self, station_id: &str) -> Option<&str> {
        self.get(station_id)
            .map(|info| info.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
