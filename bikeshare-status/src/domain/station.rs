//! Station status types.

use std::collections::BTreeMap;
use std::fmt;

/// Error returned when parsing an unrecognized station status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized station status: {0:?}")]
pub struct InvalidStationStatus(String);

/// Operating state a GBFS feed reports for a station.
///
/// Feeds that omit the field or send a value outside this set are read as
/// [`StationStatus::InService`], so every record carries a valid status.
///
/// # Examples
///
/// ```
/// use bikeshare_status::domain::StationStatus;
///
/// assert_eq!(StationStatus::parse("MAINTENANCE"), Ok(StationStatus::Maintenance));
/// assert!(StationStatus::parse("maintenance").is_err());
///
/// // Feed values never fail: unknown strings fall back to in-service
/// assert_eq!(StationStatus::from_feed(Some("CLOSED")), StationStatus::InService);
/// assert_eq!(StationStatus::from_feed(None), StationStatus::InService);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StationStatus {
    #[default]
    InService,
    Maintenance,
    OutOfService,
}

impl StationStatus {
    /// All statuses, in declaration order.
    pub const ALL: [StationStatus; 3] = [
        StationStatus::InService,
        StationStatus::Maintenance,
        StationStatus::OutOfService,
    ];

    /// Parse the exact wire string (`IN_SERVICE`, `MAINTENANCE`, `OUT_OF_SERVICE`).
    pub fn parse(s: &str) -> Result<Self, InvalidStationStatus> {
        match s {
            "IN_SERVICE" => Ok(StationStatus::InService),
            "MAINTENANCE" => Ok(StationStatus::Maintenance),
            "OUT_OF_SERVICE" => Ok(StationStatus::OutOfService),
            other => Err(InvalidStationStatus(other.to_string())),
        }
    }

    /// Read a status as it appears in a feed, defaulting when absent or unknown.
    pub fn from_feed(raw: Option<&str>) -> Self {
        raw.and_then(|s| Self::parse(s).ok()).unwrap_or_default()
    }

    /// Returns the wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StationStatus::InService => "IN_SERVICE",
            StationStatus::Maintenance => "MAINTENANCE",
            StationStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of vehicles of one type docked at a station.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleTypeCount {
    pub vehicle_type_id: String,
    pub count: u32,
}

impl VehicleTypeCount {
    pub fn new(vehicle_type_id: impl Into<String>, count: u32) -> Self {
        Self {
            vehicle_type_id: vehicle_type_id.into(),
            count,
        }
    }
}

/// One station's state at the time the feed was generated.
///
/// Records are immutable snapshots: a new fetch produces new records and
/// nothing links them to earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationStatusRecord {
    /// Station identifier, unique within a snapshot.
    pub station_id: String,

    pub status: StationStatus,

    /// Bikes available for rental.
    pub bikes_available: u32,

    /// Bikes docked but out of service.
    pub bikes_disabled: u32,

    /// Empty docks accepting returns.
    pub docks_available: u32,

    pub is_renting: bool,
    pub is_returning: bool,

    /// When the station last reported, in Unix seconds.
    pub last_reported: Option<f64>,

    /// Per-type availability, in feed order. Duplicates are kept.
    pub vehicle_types: Vec<VehicleTypeCount>,
}

impl StationStatusRecord {
    /// In service and accepting both rentals and returns.
    pub fn is_operational(&self) -> bool {
        self.status == StationStatus::InService && self.is_renting && self.is_returning
    }

    /// Whether at least `min_bikes` bikes are available.
    pub fn has_min_bikes(&self, min_bikes: u32) -> bool {
        self.bikes_available >= min_bikes
    }

    /// Available vehicles keyed by vehicle type.
    ///
    /// When the feed lists a type more than once, the last entry wins.
    pub fn bikes_by_type(&self) -> BTreeMap<String, u32> {
        self.vehicle_types
            .iter()
            .map(|vt| (vt.vehicle_type_id.clone(), vt.count))
            .collect()
    }
}

impl fmt::Display for StationStatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Station {}: {} bikes available, {} docks free [{}]",
            self.station_id, self.bikes_available, self.docks_available, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: StationStatus, is_renting: bool, is_returning: bool) -> StationStatusRecord {
        StationStatusRecord {
            station_id: "1".to_string(),
            status,
            is_renting,
            is_returning,
            ..Default::default()
        }
    }

    #[test]
    fn parse_recognized_statuses() {
        for status in StationStatus::ALL {
            assert_eq!(StationStatus::parse(status.as_str()), Ok(status));
            assert_eq!(StationStatus::from_feed(Some(status.as_str())), status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_in_service() {
        assert_eq!(StationStatus::from_feed(None), StationStatus::InService);
        assert_eq!(StationStatus::from_feed(Some("")), StationStatus::InService);
        assert_eq!(StationStatus::from_feed(Some("CLOSED")), StationStatus::InService);
        assert_eq!(
            StationStatus::from_feed(Some("out_of_service")),
            StationStatus::InService
        );
    }

    #[test]
    fn invalid_status_error_display() {
        let err = StationStatus::parse("CLOSED").unwrap_err();
        assert_eq!(err.to_string(), "unrecognized station status: \"CLOSED\"");
    }

    #[test]
    fn operational_requires_all_three_conditions() {
        for status in StationStatus::ALL {
            for is_renting in [false, true] {
                for is_returning in [false, true] {
                    let expected =
                        status == StationStatus::InService && is_renting && is_returning;
                    assert_eq!(
                        record(status, is_renting, is_returning).is_operational(),
                        expected,
                        "status={status} renting={is_renting} returning={is_returning}"
                    );
                }
            }
        }
    }

    #[test]
    fn min_bikes_is_inclusive() {
        let station = StationStatusRecord {
            bikes_available: 3,
            ..Default::default()
        };
        assert!(station.has_min_bikes(0));
        assert!(station.has_min_bikes(3));
        assert!(!station.has_min_bikes(4));
    }

    #[test]
    fn bikes_by_type_last_entry_wins() {
        let station = StationStatusRecord {
            vehicle_types: vec![
                VehicleTypeCount::new("MECHANICAL", 4),
                VehicleTypeCount::new("EBIKE", 2),
                VehicleTypeCount::new("MECHANICAL", 7),
            ],
            ..Default::default()
        };

        let by_type = station.bikes_by_type();
        assert_eq!(by_type.len(), 2);
        assert_eq!(by_type["MECHANICAL"], 7);
        assert_eq!(by_type["EBIKE"], 2);
    }

    #[test]
    fn bikes_by_type_empty() {
        assert!(StationStatusRecord::default().bikes_by_type().is_empty());
    }

    #[test]
    fn display_summary_line() {
        let station = StationStatusRecord {
            station_id: "42".to_string(),
            status: StationStatus::Maintenance,
            bikes_available: 5,
            docks_available: 12,
            ..Default::default()
        };
        assert_eq!(
            station.to_string(),
            "Station 42: 5 bikes available, 12 docks free [MAINTENANCE]"
        );
    }
}
