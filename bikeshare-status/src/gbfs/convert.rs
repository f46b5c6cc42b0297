//! Conversion from GBFS DTOs to domain types.
//!
//! Station objects are read leniently: every field has a documented default
//! and a bad field only affects itself. The functions here are pure, so the
//! mapping can be tested without a network.

use serde_json::{Map, Value};

use crate::domain::{
    FeedInfo, Snapshot, StationDirectory, StationInfo, StationStatus, StationStatusRecord,
    VehicleTypeCount,
};

use super::types::{DiscoveryResponse, StationInformationResponse, StationStatusResponse};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Discovery document has no feed list for the language
    #[error("no feeds published for language {requested:?} (available: {available:?})")]
    MissingLanguage {
        requested: String,
        available: Vec<String>,
    },
}

/// Convert a `station_status` response into a snapshot.
///
/// Never fails: stations are converted one by one with per-field defaults,
/// and a `last_updated` that is not a number reads as absent.
pub fn convert_station_status(response: &StationStatusResponse) -> Snapshot {
    let stations = response.data.stations.iter().map(convert_station).collect();
    let last_updated = response.last_updated.as_ref().and_then(Value::as_f64);

    Snapshot::new(stations, last_updated)
}

/// Convert one raw station object.
///
/// Defaults: missing numbers read as 0, missing flags as `false`, a missing
/// or unrecognized status as in-service, missing vehicle types as empty.
/// A value that is not an object yields an all-default record.
pub fn convert_station(value: &Value) -> StationStatusRecord {
    let Some(obj) = value.as_object() else {
        tracing::warn!(value = %value, "station entry is not an object; using defaults");
        return StationStatusRecord::default();
    };

    let fields = StationFields::new(obj);

    StationStatusRecord {
        station_id: fields.station_id.to_string(),
        status: fields.status(),
        bikes_available: fields.count("num_bikes_available"),
        bikes_disabled: fields.count("num_bikes_disabled"),
        docks_available: fields.count("num_docks_available"),
        is_renting: fields.flag("is_renting"),
        is_returning: fields.flag("is_returning"),
        last_reported: fields.number("last_reported"),
        vehicle_types: fields.vehicle_types(),
    }
}

/// Convert a `station_information` response into a directory keyed by id.
pub fn convert_station_information(response: &StationInformationResponse) -> StationDirectory {
    StationDirectory::new(response.data.stations.iter().map(convert_station_info))
}

/// Convert one raw `station_information` entry.
///
/// Defaults: missing id or name read as empty, missing coordinates and
/// capacity as absent. A value that is not an object yields an all-default
/// entry.
pub fn convert_station_info(value: &Value) -> StationInfo {
    let Some(obj) = value.as_object() else {
        tracing::warn!(value = %value, "station information entry is not an object; using defaults");
        return StationInfo::default();
    };

    let fields = StationFields::new(obj);

    StationInfo {
        station_id: fields.station_id.to_string(),
        name: fields.text("name"),
        lat: fields.number("lat"),
        lon: fields.number("lon"),
        capacity: fields.optional_count("capacity"),
    }
}

/// Convert one `vehicle_types_available` entry.
pub fn convert_vehicle_type(value: &Value) -> VehicleTypeCount {
    let id = value
        .get("vehicle_type_id")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let count = value.get("count").and_then(as_count).unwrap_or(0);

    VehicleTypeCount::new(id, count)
}

/// Extract the feed list for one language from a discovery document.
pub fn convert_feeds(
    response: &DiscoveryResponse,
    language: &str,
) -> Result<Vec<FeedInfo>, ConversionError> {
    let Some(feeds) = response.data.get(language) else {
        let mut available: Vec<String> = response.data.keys().cloned().collect();
        available.sort();
        return Err(ConversionError::MissingLanguage {
            requested: language.to_string(),
            available,
        });
    };

    Ok(feeds
        .feeds
        .iter()
        .map(|f| FeedInfo {
            name: f.name.clone(),
            url: f.url.clone(),
        })
        .collect())
}

/// Read a non-negative whole count, saturating at `u32::MAX`.
///
/// Whole numbers written with a decimal point (`5.0`) are accepted;
/// fractional and negative numbers are not.
fn as_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }

    // `as` saturates at u32::MAX
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u32)
}

/// Field accessors for one station object, logging values they cannot use.
struct StationFields<'a> {
    obj: &'a Map<String, Value>,
    station_id: &'a str,
}

impl<'a> StationFields<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        let station_id = obj
            .get("station_id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self { obj, station_id }
    }

    /// Look up a field, treating JSON `null` as absent.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    fn unusable(&self, key: &str, value: &Value) {
        tracing::warn!(
            station_id = self.station_id,
            field = key,
            value = %value,
            "unusable station field; using default"
        );
    }

    fn status(&self) -> StationStatus {
        let raw = self.get("status");
        let status = StationStatus::from_feed(raw.and_then(Value::as_str));
        if let Some(raw) = raw
            && raw.as_str().and_then(|s| StationStatus::parse(s).ok()).is_none()
        {
            tracing::warn!(
                station_id = self.station_id,
                status = %raw,
                "unrecognized station status; treating as in service"
            );
        }
        status
    }

    fn count(&self, key: &str) -> u32 {
        match self.get(key) {
            None => 0,
            Some(value) => as_count(value).unwrap_or_else(|| {
                self.unusable(key, value);
                0
            }),
        }
    }

    fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            None => false,
            Some(value) => value.as_bool().unwrap_or_else(|| {
                self.unusable(key, value);
                false
            }),
        }
    }

    fn optional_count(&self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        let count = as_count(value);
        if count.is_none() {
            self.unusable(key, value);
        }
        count
    }

    fn number(&self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        let n = value.as_f64();
        if n.is_none() {
            self.unusable(key, value);
        }
        n
    }

    fn text(&self, key: &str) -> String {
        match self.get(key) {
            None => String::new(),
            Some(value) => match value.as_str() {
                Some(s) => s.to_string(),
                None => {
                    self.unusable(key, value);
                    String::new()
                }
            },
        }
    }

    fn vehicle_types(&self) -> Vec<VehicleTypeCount> {
        match self.get("vehicle_types_available") {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries.iter().map(convert_vehicle_type).collect(),
            Some(value) => {
                self.unusable("vehicle_types_available", value);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_station() {
        let value = json!({
            "station_id": "1",
            "status": "IN_SERVICE",
            "num_bikes_available": 12,
            "num_bikes_disabled": 1,
            "num_docks_available": 14,
            "is_renting": true,
            "is_returning": true,
            "last_reported": 1700000000,
            "vehicle_types_available": [
                { "vehicle_type_id": "MECHANICAL", "count": 9 },
                { "vehicle_type_id": "EBIKE", "count": 3 }
            ],
            "is_charging_station": false
        });

        let station = convert_station(&value);
        assert_eq!(station.station_id, "1");
        assert_eq!(station.status, StationStatus::InService);
        assert_eq!(station.bikes_available, 12);
        assert_eq!(station.bikes_disabled, 1);
        assert_eq!(station.docks_available, 14);
        assert!(station.is_renting);
        assert!(station.is_returning);
        assert_eq!(station.last_reported, Some(1_700_000_000.0));
        assert_eq!(
            station.vehicle_types,
            vec![
                VehicleTypeCount::new("MECHANICAL", 9),
                VehicleTypeCount::new("EBIKE", 3),
            ]
        );
        assert!(station.is_operational());
    }

    #[test]
    fn recognized_statuses_are_kept() {
        for status in StationStatus::ALL {
            let station = convert_station(&json!({ "station_id": "1", "status": status.as_str() }));
            assert_eq!(station.status, status);
        }
    }

    #[test]
    fn unrecognized_or_missing_status_is_in_service() {
        for value in [
            json!({ "station_id": "1" }),
            json!({ "station_id": "1", "status": "CLOSED" }),
            json!({ "station_id": "1", "status": null }),
            json!({ "station_id": "1", "status": 3 }),
        ] {
            assert_eq!(convert_station(&value).status, StationStatus::InService);
        }
    }

    #[test]
    fn empty_object_gets_all_defaults() {
        let station = convert_station(&json!({}));
        assert_eq!(station, StationStatusRecord::default());
        assert_eq!(station.station_id, "");
        assert!(!station.is_renting);
        assert!(!station.is_returning);
        assert!(station.last_reported.is_none());
        assert!(station.vehicle_types.is_empty());
    }

    #[test]
    fn non_object_station_gets_all_defaults() {
        assert_eq!(convert_station(&json!(7)), StationStatusRecord::default());
        assert_eq!(convert_station(&json!(null)), StationStatusRecord::default());
    }

    #[test]
    fn bad_field_does_not_affect_others() {
        let station = convert_station(&json!({
            "station_id": "9",
            "num_bikes_available": "lots",
            "num_bikes_disabled": -2,
            "num_docks_available": 4,
            "is_renting": "yes",
            "is_returning": true,
            "last_reported": "yesterday",
            "vehicle_types_available": { "MECHANICAL": 2 }
        }));

        assert_eq!(station.station_id, "9");
        assert_eq!(station.bikes_available, 0);
        assert_eq!(station.bikes_disabled, 0);
        assert_eq!(station.docks_available, 4);
        assert!(!station.is_renting);
        assert!(station.is_returning);
        assert!(station.last_reported.is_none());
        assert!(station.vehicle_types.is_empty());
    }

    #[test]
    fn huge_counts_saturate() {
        let station = convert_station(&json!({ "num_bikes_available": 1u64 << 40 }));
        assert_eq!(station.bikes_available, u32::MAX);
    }

    #[test]
    fn whole_counts_with_decimal_point_are_kept() {
        let station = convert_station(&json!({
            "station_id": "1",
            "status": "IN_SERVICE",
            "num_bikes_available": 5.0,
            "num_docks_available": 1e10,
            "is_renting": true,
            "is_returning": true,
            "vehicle_types_available": [{ "vehicle_type_id": "EBIKE", "count": 2.0 }]
        }));

        assert_eq!(station.bikes_available, 5);
        assert_eq!(station.docks_available, u32::MAX);
        assert!(station.has_min_bikes(1));
        assert_eq!(station.bikes_by_type().get("EBIKE"), Some(&2));
    }

    #[test]
    fn fractional_and_negative_counts_are_zero() {
        let station = convert_station(&json!({
            "num_bikes_available": 2.5,
            "num_bikes_disabled": -1.0,
            "vehicle_types_available": [{ "vehicle_type_id": "EBIKE", "count": 0.5 }]
        }));

        assert_eq!(station.bikes_available, 0);
        assert_eq!(station.bikes_disabled, 0);
        assert_eq!(station.vehicle_types, vec![VehicleTypeCount::new("EBIKE", 0)]);
    }

    #[test]
    fn fractional_last_reported_is_kept() {
        let station = convert_station(&json!({ "last_reported": 1700000000.25 }));
        assert_eq!(station.last_reported, Some(1_700_000_000.25));
    }

    #[test]
    fn vehicle_type_defaults() {
        assert_eq!(convert_vehicle_type(&json!({})), VehicleTypeCount::new("", 0));
        assert_eq!(
            convert_vehicle_type(&json!({ "vehicle_type_id": "EBIKE" })),
            VehicleTypeCount::new("EBIKE", 0)
        );
        assert_eq!(convert_vehicle_type(&json!("EBIKE")), VehicleTypeCount::new("", 0));
    }

    #[test]
    fn vehicle_types_keep_order_and_duplicates() {
        let station = convert_station(&json!({
            "vehicle_types_available": [
                { "vehicle_type_id": "EBIKE", "count": 1 },
                { "vehicle_type_id": "MECHANICAL", "count": 2 },
                { "vehicle_type_id": "EBIKE", "count": 5 }
            ]
        }));

        let ids: Vec<_> = station
            .vehicle_types
            .iter()
            .map(|vt| vt.vehicle_type_id.as_str())
            .collect();
        assert_eq!(ids, vec!["EBIKE", "MECHANICAL", "EBIKE"]);
        assert_eq!(station.bikes_by_type()["EBIKE"], 5);
    }

    #[test]
    fn station_status_response() {
        let response: StationStatusResponse = serde_json::from_value(json!({
            "last_updated": 1700000000,
            "data": { "stations": [
                { "station_id": "A", "num_bikes_available": 5 },
                { "station_id": "B" }
            ] }
        }))
        .unwrap();

        let snapshot = convert_station_status(&response);
        assert_eq!(snapshot.last_updated, Some(1_700_000_000.0));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.stations[0].station_id, "A");
        assert_eq!(snapshot.stations[1].station_id, "B");
    }

    #[test]
    fn non_numeric_last_updated_is_absent() {
        let response: StationStatusResponse = serde_json::from_value(json!({
            "last_updated": "recently",
            "data": { "stations": [] }
        }))
        .unwrap();

        assert!(convert_station_status(&response).last_updated.is_none());
    }

    #[test]
    fn station_info_full_and_defaults() {
        let info = convert_station_info(&json!({
            "station_id": "1",
            "name": "GRAN VIA CORTS CATALANES, 760",
            "lat": 41.3979779,
            "lon": 2.1801069,
            "capacity": 46.0,
            "post_code": "08013"
        }));
        assert_eq!(info.station_id, "1");
        assert_eq!(info.name, "GRAN VIA CORTS CATALANES, 760");
        assert_eq!(info.lat, Some(41.3979779));
        assert_eq!(info.lon, Some(2.1801069));
        assert_eq!(info.capacity, Some(46));

        assert_eq!(convert_station_info(&json!({})), StationInfo::default());
        assert_eq!(convert_station_info(&json!("1")), StationInfo::default());
    }

    #[test]
    fn station_info_bad_field_does_not_affect_others() {
        let info = convert_station_info(&json!({
            "station_id": "2",
            "name": 17,
            "lat": "north",
            "lon": 2.17,
            "capacity": -3
        }));
        assert_eq!(info.station_id, "2");
        assert_eq!(info.name, "");
        assert_eq!(info.lat, None);
        assert_eq!(info.lon, Some(2.17));
        assert_eq!(info.capacity, None);
    }

    #[test]
    fn station_information_response() {
        let response: StationInformationResponse = serde_json::from_value(json!({
            "data": { "stations": [
                { "station_id": "A", "name": "Plaça Catalunya" },
                { "station_id": "B", "name": "Sagrada Família" },
                7
            ] }
        }))
        .unwrap();

        let directory = convert_station_information(&response);
        assert_eq!(directory.name_of("A"), Some("Plaça Catalunya"));
        assert_eq!(directory.name_of("B"), Some("Sagrada Família"));
        // The non-object entry lands under the empty id
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn feeds_for_language() {
        let response: DiscoveryResponse = serde_json::from_value(json!({
            "data": {
                "en": { "feeds": [
                    { "name": "system_information", "url": "https://x/en/system_information" },
                    { "name": "station_status", "url": "https://x/en/station_status" }
                ] }
            }
        }))
        .unwrap();

        let feeds = convert_feeds(&response, "en").unwrap();
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[1].name, "station_status");
        assert_eq!(feeds[1].url, "https://x/en/station_status");
    }

    #[test]
    fn feeds_missing_language() {
        let response: DiscoveryResponse = serde_json::from_value(json!({
            "data": { "es": { "feeds": [] }, "ca": { "feeds": [] } }
        }))
        .unwrap();

        let err = convert_feeds(&response, "en").unwrap_err();
        assert_eq!(
            err,
            ConversionError::MissingLanguage {
                requested: "en".to_string(),
                available: vec!["ca".to_string(), "es".to_string()],
            }
        );
    }
}
