//! Application state for the web layer.

use std::sync::Arc;

use crate::catalog::StationStatusCatalog;

/// Shared application state.
///
/// Holds no station data: each request fetches its own snapshot.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StationStatusCatalog>,
}

impl AppState {
    pub fn new(catalog: StationStatusCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}
