//! HTTP route handlers.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::catalog::DEFAULT_MIN_BIKES;
use crate::gbfs::FeedError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
///
/// `/ip` reports the peer address only when the router is served with
/// connect info (see [`serve`]); otherwise it relies on proxy headers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ip", get(client_ip))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/operational", get(operational_stations))
        .route("/api/stations/available", get(available_stations))
        .route("/api/stations/:station_id", get(station_by_id))
        .route("/api/summary", get(summary))
        .route("/api/feeds", get(list_feeds))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the application on `listener` until the task is dropped.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    let app = create_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Placeholder when neither headers nor the socket identify the caller.
const UNKNOWN_IP: &str = "unknown";

/// Report the caller's IP address.
async fn client_ip(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Json<IpResponse> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    Json(IpResponse {
        ip: resolve_client_ip(&headers, peer),
    })
}

/// Work out the client address, preferring proxy headers.
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the
/// socket peer.
fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first) = header_value(headers, "x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header_value(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    peer.map_or_else(|| UNKNOWN_IP.to_string(), |addr| addr.ip().to_string())
}

/// A header as trimmed text, if present, valid and non-empty.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// All stations, named from `station_information` where possible.
async fn list_stations(State(state): State<AppState>) -> Result<Json<StationListResponse>, AppError> {
    let snapshot = state.catalog.try_fetch_snapshot().await?;
    let directory = state.catalog.fetch_station_directory().await;
    Ok(Json(StationListResponse::new(
        &snapshot,
        &directory,
        &snapshot.stations,
    )))
}

/// Stations in service that accept rentals and returns.
async fn operational_stations(
    State(state): State<AppState>,
) -> Result<Json<StationListResponse>, AppError> {
    let snapshot = state.catalog.try_fetch_snapshot().await?;
    let directory = state.catalog.fetch_station_directory().await;
    Ok(Json(StationListResponse::new(
        &snapshot,
        &directory,
        snapshot.operational(),
    )))
}

/// Stations with at least `min_bikes` bikes.
async fn available_stations(
    State(state): State<AppState>,
    Query(req): Query<AvailableStationsRequest>,
) -> Result<Json<StationListResponse>, AppError> {
    let min_bikes = req.min_bikes.unwrap_or(DEFAULT_MIN_BIKES);
    let snapshot = state.catalog.try_fetch_snapshot().await?;
    let directory = state.catalog.fetch_station_directory().await;
    Ok(Json(StationListResponse::new(
        &snapshot,
        &directory,
        snapshot.with_min_bikes(min_bikes),
    )))
}

/// One station by id.
async fn station_by_id(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<StationResult>, AppError> {
    let snapshot = state.catalog.try_fetch_snapshot().await?;
    let station = snapshot
        .find_by_id(&station_id)
        .ok_or_else(|| AppError::NotFound {
            message: format!("No station with id {station_id}"),
        })?;
    let directory = state.catalog.fetch_station_directory().await;
    Ok(Json(StationResult::from_record(station, &directory)))
}

/// Aggregate availability.
async fn summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let snapshot = state.catalog.try_fetch_snapshot().await?;
    Ok(Json(SummaryResponse::new(
        snapshot.last_updated,
        snapshot.summary(),
    )))
}

/// Feeds advertised by the system's discovery document.
async fn list_feeds(State(state): State<AppState>) -> Result<Json<FeedListResponse>, AppError> {
    let client = state.catalog.client();
    let feeds = client.fetch_feeds().await?;
    Ok(Json(FeedListResponse {
        language: client.config().language.clone(),
        feeds: feeds.into_iter().map(FeedResult::from).collect(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    /// The feed could not be fetched or read
    Upstream { message: String },
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            tracing::warn!(%status, %message, "request failed");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
