//! Fleet client tests against an in-process fake of the fleet v1 API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use fleetwatch_core::{ActiveState, FleetwatchConfig};
use fleetwatch_source::{FleetApiClient, SourceError, StateSource};
use serde_json::json;

async fn spawn_fake(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> FleetApiClient {
    let config = FleetwatchConfig {
        fleet_endpoint: format!("http://{addr}"),
        ..FleetwatchConfig::default()
    };
    FleetApiClient::new(&config).unwrap()
}

async fn paged_states(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("nextPageToken").map(String::as_str) {
        None => Json(json!({
            "states": [
                {"name": "kafka.service", "machineID": "m1", "systemdActiveState": "active"},
                {"name": "deployer.service", "machineID": "m2", "systemdActiveState": "inactive"}
            ],
            "nextPageToken": "page-2"
        })),
        Some("page-2") => Json(json!({
            "states": [
                {"name": "deployer.timer", "machineID": "m2", "systemdActiveState": "active"}
            ]
        })),
        Some(_) => Json(json!({})),
    }
}

#[tokio::test]
async fn follows_pagination() {
    let addr = spawn_fake(Router::new().route("/fleet/v1/state", get(paged_states))).await;
    let client = client_for(addr);

    let snapshot = client.fetch_unit_states().await.unwrap();

    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains("deployer.timer"));
    assert_eq!(
        snapshot.get("deployer.service").unwrap().active_state,
        ActiveState::Inactive
    );
}

#[tokio::test]
async fn empty_cluster_is_empty_snapshot() {
    let router = Router::new().route("/fleet/v1/state", get(|| async { Json(json!({})) }));
    let addr = spawn_fake(router).await;

    let snapshot = client_for(addr).fetch_unit_states().await.unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn non_success_status_is_error() {
    let router = Router::new().route(
        "/fleet/v1/state",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "etcd unavailable") }),
    );
    let addr = spawn_fake(router).await;

    let err = client_for(addr).fetch_unit_states().await.unwrap_err();
    match err {
        SourceError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "etcd unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let router = Router::new().route("/fleet/v1/state", get(|| async { "not json" }));
    let addr = spawn_fake(router).await;

    let err = client_for(addr).fetch_unit_states().await.unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).fetch_unit_states().await.unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)));
}

#[tokio::test]
async fn endless_slow_pagination_times_out() {
    async fn slow_page() -> Json<serde_json::Value> {
        tokio::time::sleep(Duration::from_millis(700)).await;
        Json(json!({
            "states": [{"name": "kafka.service", "machineID": "m1", "systemdActiveState": "active"}],
            "nextPageToken": "more"
        }))
    }
    let addr = spawn_fake(Router::new().route("/fleet/v1/state", get(slow_page))).await;

    let mut config = FleetwatchConfig {
        fleet_endpoint: format!("http://{addr}"),
        ..FleetwatchConfig::default()
    };
    config.timeouts.request_secs = 1;
    let client = FleetApiClient::new(&config).unwrap();

    let started = Instant::now();
    let result = tokio::time::timeout(Duration::from_secs(5), client.fetch_unit_states())
        .await
        .expect("read must be bounded by the request timeout");

    assert!(matches!(result, Err(SourceError::Timeout(d)) if d == Duration::from_secs(1)));
    assert!(started.elapsed() < Duration::from_secs(3));
}
