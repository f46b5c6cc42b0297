//! Web layer for the station status service.
//!
//! Exposes the catalog as a small JSON API.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router, serve};
pub use state::AppState;
