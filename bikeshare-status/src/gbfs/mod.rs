//! GBFS (General Bikeshare Feed Specification) client.
//!
//! This module fetches GBFS feeds over HTTP and turns them into domain
//! types.
//!
//! Key characteristics of GBFS feeds as read here:
//! - Every feed is a JSON envelope `{ last_updated, ttl, data }`
//! - Timestamps are POSIX seconds, occasionally fractional
//! - Station objects vary between systems, so they are read field by field
//!   with defaults rather than through a strict schema

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, GbfsClient, GbfsConfig};
pub use convert::{
    ConversionError, convert_feeds, convert_station, convert_station_info,
    convert_station_information, convert_station_status, convert_vehicle_type,
};
pub use error::FeedError;
pub use types::{
    DiscoveryResponse, FeedDto, LanguageFeeds, StationInformationData, StationInformationResponse,
    StationStatusData, StationStatusResponse,
};
