//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - All REST endpoints return correct responses and status codes
//! - Event CRUD follows the lenient payload rules
//! - WebSocket clients receive the snapshot and lifecycle signals
//! - Grafana datasource routes answer in the protocol's shape

use std::net::SocketAddr;

use futures::StreamExt;
use itom_monitor::{
    actors::monitor::MonitorHandle,
    api::{ApiConfig, ApiState, spawn_api_server},
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::helpers::*;

// Helper to create test API server
async fn spawn_test_api(monitor: MonitorHandle) -> SocketAddr {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(), // Random port
        enable_cors: true,
    };

    spawn_api_server(config, ApiState::new(monitor)).await.unwrap()
}

async fn get_json(client: &reqwest::Client, url: String) -> Value {
    let response = client.get(url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let addr = spawn_test_api(spawn_calm_monitor(&["laptop-01"])).await;
    let client = reqwest::Client::new();

    for path in ["api/health", "grafana/health"] {
        let body = get_json(&client, format!("http://{addr}/{path}")).await;
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_current_data_samples_and_latest_peeks() {
    let monitor = spawn_hot_monitor();
    let addr = spawn_test_api(monitor.clone()).await;
    let client = reqwest::Client::new();

    let fresh = get_json(&client, format!("http://{addr}/api/current-data")).await;
    assert_eq!(fresh["servers"].as_array().unwrap().len(), 5);
    assert_eq!(fresh["servers"][0]["name"], "laptop-01");
    assert_eq!(fresh["servers"][0]["status"], "online");
    assert_eq!(fresh["servers"][0]["metrics"]["cpu_usage"], 95.0);
    assert_eq!(fresh["alerts"][0]["severity"], "critical");

    let latest = get_json(&client, format!("http://{addr}/api/current-data/latest")).await;
    assert_eq!(latest, fresh);

    let stats = get_json(&client, format!("http://{addr}/api/stats")).await;
    assert_eq!(stats["events"], 1);
    assert_eq!(stats["alerts"], 1);
    assert_eq!(stats["critical_alerts"], 1);
    assert_eq!(stats["hosts"], 5);
}

#[tokio::test]
async fn test_alerts_limit() {
    let monitor = spawn_hot_monitor();
    for _ in 0..4 {
        monitor.generate_snapshot().await.unwrap();
    }
    let addr = spawn_test_api(monitor).await;
    let client = reqwest::Client::new();

    let all = get_json(&client, format!("http://{addr}/api/alerts")).await;
    assert_eq!(all.as_array().unwrap().len(), 4);

    let limited = get_json(&client, format!("http://{addr}/api/alerts?limit=2")).await;
    assert_eq!(limited.as_array().unwrap().len(), 2);
    assert_eq!(limited[0]["server"], "laptop-01");
    assert_eq!(limited[0]["metric"], "cpu_usage");
}

#[tokio::test]
async fn test_event_crud_roundtrip() {
    let addr = spawn_test_api(spawn_calm_monitor(&["laptop-01"])).await;
    let client = reqwest::Client::new();
    let events_url = format!("http://{addr}/api/events");

    let response = client
        .post(&events_url)
        .json(&json!({"title": "t", "colour": "red", "priority": 7}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["id"], "EVT1001");
    assert_eq!(created["number"], "EVT1001");
    assert_eq!(created["severity"], "low");
    assert_eq!(created["priority"], "low");
    assert_eq!(created["status"], "new");
    assert_eq!(created["notes"], json!([]));
    assert!(created.get("colour").is_none());

    let event_url = format!("{events_url}/EVT1001");
    let fetched = get_json(&client, event_url.clone()).await;
    assert_eq!(fetched, created);

    let response = client
        .put(&event_url)
        .json(&json!({"status": "closed", "note": "done"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["status"], "closed");
    assert!(updated["resolved_at"].is_string());
    assert_eq!(updated["notes"][0]["text"], "done");

    let listed = get_json(&client, events_url.clone()).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = client.delete(&event_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true}));

    let response = client.get(&event_url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_errors() {
    let addr = spawn_test_api(spawn_calm_monitor(&["laptop-01"])).await;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("http://{addr}/api/events/EVT4242"))
        .json(&json!({"status": "resolved"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Event not found");

    let response = client
        .post(format!("http://{addr}/api/events"))
        .json(&json!(["not", "an", "object"]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .delete(format!("http://{addr}/api/events/EVT4242"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let addr = spawn_test_api(spawn_calm_monitor(&["laptop-01"])).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/events"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .put(format!("http://{addr}/api/events/EVT1001"))
        .body(r#"{"status": "closed"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(format!("http://{addr}/grafana/query"))
        .header("content-type", "application/json")
        .body("[")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_websocket_streams_snapshot_then_events() {
    let monitor = spawn_calm_monitor(&["laptop-01", "laptop-02"]);
    let addr = spawn_test_api(monitor.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    let first = next_json(&mut ws).await;
    assert_eq!(first["type"], "monitoring_update");
    assert_eq!(first["data"]["servers"].as_array().unwrap().len(), 2);

    // the subscription is registered before the snapshot frame is sent
    let client = reqwest::Client::new();
    client
        .post(format!("http://{addr}/api/events"))
        .json(&json!({"title": "from test"}))
        .send()
        .await
        .unwrap();

    let created = next_json(&mut ws).await;
    assert_eq!(created["type"], "event_created");
    assert_eq!(created["data"]["title"], "from test");

    client
        .delete(format!("http://{addr}/api/events/EVT1001"))
        .send()
        .await
        .unwrap();

    let deleted = next_json(&mut ws).await;
    assert_eq!(deleted, json!({"type": "event_deleted", "data": {"id": "EVT1001"}}));
}

async fn next_json<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(std::time::Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .unwrap();

        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_grafana_search_and_query() {
    let addr = spawn_test_api(spawn_hot_monitor()).await;
    let client = reqwest::Client::new();

    let search: Value = client
        .post(format!("http://{addr}/grafana/search"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(search.as_array().unwrap().len(), 8);
    assert_eq!(search[7], "health_score");

    let series: Value = client
        .post(format!("http://{addr}/grafana/query"))
        .json(&json!({"targets": [
            {"target": "cpu_usage"},
            {"target": "no_such_metric"},
            {"target": "health_score"},
            {"target": "events_count"},
        ]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let series = series.as_array().unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0]["target"], "cpu_usage");
    assert_eq!(series[0]["datapoints"].as_array().unwrap().len(), 5);
    assert_eq!(series[0]["datapoints"][0][0], 95.0);
    // one of five hosts loses 20 points
    assert_eq!(series[1]["datapoints"][0][0], 96.0);
    assert_eq!(series[2]["datapoints"][0][0], 1.0);
}

#[tokio::test]
async fn test_grafana_annotations_and_metrics() {
    let monitor = spawn_hot_monitor();
    monitor.generate_snapshot().await.unwrap();
    let addr = spawn_test_api(monitor.clone()).await;
    let client = reqwest::Client::new();

    let annotations: Value = client
        .post(format!("http://{addr}/grafana/annotations"))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(annotations.as_array().unwrap().len(), 1);
    assert_eq!(annotations[0]["annotation"], "alerts");
    assert_eq!(annotations[0]["title"], "laptop-01 - cpu_usage");
    assert_eq!(annotations[0]["tags"], json!(["critical", "laptop-01"]));

    let metrics = get_json(&client, format!("http://{addr}/grafana/metrics")).await;
    let metrics = metrics.as_array().unwrap();
    assert_eq!(metrics.len(), 5 * 4 + 3);
    assert_eq!(metrics[20]["metric"], "total_alerts");
    assert_eq!(metrics[20]["value"], 1.0);

    // reading the Grafana routes never samples
    assert_eq!(monitor.stats().await.unwrap().events, 1);
}
