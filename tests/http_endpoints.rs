// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use openwrt_exporter::{
    AppState, Config, DeviceMapping, DeviceRecord, MetricsRegistry, RouterConfig, RouterLabels,
    RouterOptions, RouterSnapshot, RouterStates, SensorSnapshot, SensorValue, SessionStatus,
    create_router,
};
use std::sync::Arc;
use tower::ServiceExt;

fn make_state(routers: Vec<RouterConfig>) -> Arc<AppState> {
    let config = Config {
        server_addr: "127.0.0.1:9100".to_string(),
        routers,
        collection_interval_secs: 30,
    };
    Arc::new(AppState {
        config,
        metrics: MetricsRegistry::new(),
        routers: RouterStates::new(),
    })
}

fn test_router(name: &str) -> RouterConfig {
    RouterConfig {
        name: name.to_string(),
        host: "192.168.1.1".to_string(),
        port: 22,
        username: "root".to_string(),
        ssh_key: None,
        options: RouterOptions::default(),
    }
}

fn snapshot(router: &str, status: SessionStatus, macs: &[&str]) -> RouterSnapshot {
    let devices: DeviceMapping = macs
        .iter()
        .map(|mac| {
            (
                (*mac).to_string(),
                DeviceRecord {
                    mac_address: (*mac).to_string(),
                    ip_address: Some("192.168.1.20".to_string()),
                    hostname: Some("laptop".to_string()),
                    interface: None,
                    status: None,
                },
            )
        })
        .collect();
    let mut sensors = SensorSnapshot::new();
    sensors.insert("load_avg_1m".to_string(), SensorValue::Float(0.25));
    sensors.insert(
        "devices_connected".to_string(),
        SensorValue::Int(macs.len() as u64),
    );
    RouterSnapshot {
        router_name: router.to_string(),
        status,
        devices,
        sensors,
    }
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, String) {
    let app = create_router(state);
    let resp = app
        .oneshot(Request::get(uri).body(String::new()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();
    (status, body)
}

// --- /metrics endpoint ---

#[tokio::test]
async fn metrics_returns_200_with_text_content_type() {
    let state = make_state(vec![test_router("r1")]);
    let app = create_router(state);

    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(ct.starts_with("text/plain"), "unexpected content-type: {ct}");
}

#[tokio::test]
async fn metrics_contains_registered_metric_names() {
    let state = make_state(vec![test_router("r1")]);
    state.metrics.initialize_router_metrics(&RouterLabels {
        router: "r1".to_string(),
    });
    let (_, body) = get(state, "/metrics").await;

    assert!(body.contains("openwrt_collection_cycle_duration_milliseconds"));
    assert!(body.contains("openwrt_scrape_success_total{router=\"r1\"} 0"));
    assert!(body.contains("openwrt_scrape_errors_total{router=\"r1\"} 0"));
    // no label set yet, nothing to encode
    assert!(!body.contains("openwrt_sensor{"));
}

#[tokio::test]
async fn metrics_contains_router_data_after_update() {
    let state = make_state(vec![test_router("myrouter")]);
    let snap = snapshot(
        "myrouter",
        SessionStatus::Available,
        &["AA:BB:CC:DD:EE:01", "AA:BB:CC:DD:EE:02"],
    );
    state.metrics.update_metrics(&snap).await;

    let (status, body) = get(state, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("router=\"myrouter\""));
    assert!(body.contains("sensor=\"load_avg_1m\""));
    assert!(body.contains("openwrt_devices_connected{router=\"myrouter\"} 2"));
    assert!(body.contains("openwrt_router_available{router=\"myrouter\"} 1"));
}

// --- /health endpoint ---

#[tokio::test]
async fn health_returns_ok_for_empty_config() {
    let (status, body) = get(make_state(vec![]), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    assert!(health["routers"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_pending_before_first_poll() {
    let (_, body) = get(make_state(vec![test_router("r1")]), "/health").await;

    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["routers"]["r1"], "pending");
}

#[tokio::test]
async fn health_reports_degraded_router() {
    let state = make_state(vec![test_router("good"), test_router("bad")]);
    state
        .routers
        .update(&snapshot("good", SessionStatus::Available, &[]), None)
        .await;
    state
        .routers
        .update(&snapshot("bad", SessionStatus::Unavailable, &[]), None)
        .await;

    let (status, body) = get(state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["routers"]["good"], "available");
    assert_eq!(health["routers"]["bad"], "unavailable");
}

// --- /devices endpoint ---

#[tokio::test]
async fn devices_lists_last_collected_devices() {
    let state = make_state(vec![test_router("r1")]);
    state
        .routers
        .update(
            &snapshot(
                "r1",
                SessionStatus::Available,
                &["AA:BB:CC:DD:EE:02", "AA:BB:CC:DD:EE:01"],
            ),
            None,
        )
        .await;

    let (status, body) = get(state, "/devices").await;

    assert_eq!(status, StatusCode::OK);
    let devices: serde_json::Value = serde_json::from_str(&body).unwrap();
    let r1 = &devices["r1"];
    assert_eq!(r1["status"], "available");
    assert!(r1["info"].is_null());
    assert_eq!(r1["devices"][0]["mac_address"], "AA:BB:CC:DD:EE:01");
    assert_eq!(r1["devices"][1]["hostname"], "laptop");
}

#[tokio::test]
async fn devices_empty_before_first_poll() {
    let (status, body) = get(make_state(vec![test_router("r1")]), "/devices").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "{}");
}

// --- 404 for unknown routes ---

#[tokio::test]
async fn unknown_route_returns_404() {
    let (status, _) = get(make_state(vec![]), "/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
