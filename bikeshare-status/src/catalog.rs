//! Station status catalog.
//!
//! Answers station queries from the live feed. Every query fetches a fresh
//! snapshot: there is no cache, so an answer is never older than the call
//! that produced it. Callers that want several answers from one fetch
//! should take a [`Snapshot`] with [`StationStatusCatalog::try_fetch_snapshot`]
//! and query that instead.
//!
//! The query methods have a simple contract: any
//! failure (network, HTTP status, malformed body, unexpected shape) reads
//! as an empty station list with no timestamp. The failure itself is
//! logged, and is available in full from `try_fetch_snapshot`.

use crate::domain::{Snapshot, StationDirectory, StationStatusRecord};
use crate::gbfs::{FeedError, GbfsClient, GbfsConfig};

/// Minimum bikes used by [`StationStatusCatalog::filter_with_available_bikes`].
pub const DEFAULT_MIN_BIKES: u32 = 1;

/// Always-fresh queries over a system's station status feed.
#[derive(Debug, Clone)]
pub struct StationStatusCatalog {
    client: GbfsClient,
}

impl StationStatusCatalog {
    pub fn new(client: GbfsClient) -> Self {
        Self { client }
    }

    /// Build a catalog with its own client.
    pub fn from_config(config: GbfsConfig) -> Result<Self, FeedError> {
        Ok(Self::new(GbfsClient::new(config)?))
    }

    /// Access the underlying client.
    pub fn client(&self) -> &GbfsClient {
        &self.client
    }

    /// Fetch a snapshot, reporting why it failed if it did.
    pub async fn try_fetch_snapshot(&self) -> Result<Snapshot, FeedError> {
        self.client.fetch_station_status().await
    }

    /// Fetch all stations and the feed's `last_updated` time.
    ///
    /// Returns `(vec![], None)` on any failure.
    pub async fn fetch_snapshot(&self) -> (Vec<StationStatusRecord>, Option<f64>) {
        self.fetch_or_empty().await.into_parts()
    }

    /// Fetch, then return the first station with the given id.
    pub async fn find_by_id(&self, station_id: &str) -> Option<StationStatusRecord> {
        self.fetch_or_empty().await.find_by_id(station_id).cloned()
    }

    /// Fetch, then keep operational stations in feed order.
    pub async fn filter_operational(&self) -> Vec<StationStatusRecord> {
        self.fetch_or_empty().await.operational().cloned().collect()
    }

    /// Fetch, then keep stations with at least `min_bikes` bikes, in feed order.
    pub async fn filter_by_min_bikes(&self, min_bikes: u32) -> Vec<StationStatusRecord> {
        self.fetch_or_empty()
            .await
            .with_min_bikes(min_bikes)
            .cloned()
            .collect()
    }

    /// [`filter_by_min_bikes`](Self::filter_by_min_bikes) with [`DEFAULT_MIN_BIKES`].
    pub async fn filter_with_available_bikes(&self) -> Vec<StationStatusRecord> {
        self.filter_by_min_bikes(DEFAULT_MIN_BIKES).await
    }

    /// Fetch station names and locations.
    ///
    /// Names only label status records, so a failed fetch is logged and
    /// reads as an empty directory rather than failing the caller.
    pub async fn fetch_station_directory(&self) -> StationDirectory {
        match self.client.fetch_station_information().await {
            Ok(directory) => directory,
            Err(e) => {
                tracing::warn!(
                    url = %self.client.config().station_information_url(),
                    error = %e,
                    "station information fetch failed; stations will be unnamed"
                );
                StationDirectory::default()
            }
        }
    }

    async fn fetch_or_empty(&self) -> Snapshot {
        match self.try_fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    url = %self.client.config().station_status_url(),
                    error = %e,
                    "station status fetch failed; treating as no stations"
                );
                Snapshot::default()
            }
        }
    }
}
