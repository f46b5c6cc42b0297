//! In-process stub servers for tests.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serve a fixed status and body at `path`.
pub(crate) async fn serve_status(path: &str, status: StatusCode, body: &str) -> String {
    let body = body.to_string();
    let router = Router::new().route(
        path,
        get(move || {
            let body = body.clone();
            async move { (status, body) }
        }),
    );
    serve(router).await
}

/// Serve 200 responses with fixed bodies, one per path.
pub(crate) async fn serve_feeds(feeds: &[(&str, &str)]) -> String {
    let mut router = Router::new();
    for (path, body) in feeds {
        let body = body.to_string();
        router = router.route(
            path,
            get(move || {
                let body = body.clone();
                async move { body }
            }),
        );
    }
    serve(router).await
}

/// Serve a 200 response with a fixed body at `path`.
pub(crate) async fn serve_json(path: &str, body: &str) -> String {
    serve_status(path, StatusCode::OK, body).await
}

/// A base URL nothing is listening on.
pub(crate) async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Station-status body with two stations: "A" is operational with five
/// bikes; "B" has no bikes and is not renting.
pub(crate) const TWO_STATIONS: &str = r#"{
    "last_updated": 1700000000,
    "ttl": 5,
    "data": {
        "stations": [
            {
                "station_id": "A",
                "status": "IN_SERVICE",
                "num_bikes_available": 5,
                "num_bikes_disabled": 0,
                "num_docks_available": 10,
                "is_renting": true,
                "is_returning": true,
                "last_reported": 1699999990,
                "vehicle_types_available": [
                    { "vehicle_type_id": "MECHANICAL", "count": 3 },
                    { "vehicle_type_id": "EBIKE", "count": 2 }
                ]
            },
            {
                "station_id": "B",
                "status": "IN_SERVICE",
                "num_bikes_available": 0,
                "num_bikes_disabled": 2,
                "num_docks_available": 15,
                "is_renting": false,
                "is_returning": true,
                "last_reported": 1699999980
            }
        ]
    }
}"#;

/// Station-information body naming the stations in [`TWO_STATIONS`].
pub(crate) const TWO_STATIONS_INFO: &str = r#"{
    "last_updated": 1700000000,
    "data": {
        "stations": [
            {
                "station_id": "A",
                "name": "Plaça Catalunya",
                "lat": 41.3870,
                "lon": 2.1700,
                "capacity": 15
            },
            {
                "station_id": "B",
                "name": "Sagrada Família",
                "lat": 41.4036,
                "lon": 2.1744,
                "capacity": 20
            }
        ]
    }
}"#;
