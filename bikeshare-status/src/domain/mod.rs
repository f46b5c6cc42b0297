//! Domain types for bikeshare station status.
//!
//! These are the validated, feed-independent shapes the rest of the crate
//! works with. Every field has a defined value: conversion from feed JSON
//! fills gaps with defaults, so code receiving these types never has to
//! second-guess them.

mod feed;
mod snapshot;
mod station;
mod station_info;
mod time;

pub use feed::FeedInfo;
pub use snapshot::{Snapshot, SnapshotSummary};
pub use station::{InvalidStationStatus, StationStatus, StationStatusRecord, VehicleTypeCount};
pub use station_info::{StationDirectory, StationInfo};
pub use time::unix_seconds_to_utc;
