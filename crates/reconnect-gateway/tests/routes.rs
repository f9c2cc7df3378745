// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route-level tests driving the router in-process.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reconnect_analytics::{AnalyticsEngine, AnalyticsSettings};
use reconnect_core::types::QualificationResult;
use reconnect_gateway::{GatewayState, HealthState, router};
use reconnect_test_utils::fixtures::{at, inbound, prospect, vendor};
use reconnect_test_utils::{MemoryEventStore, Seed};
use serde_json::Value;
use tower::ServiceExt;

fn state_over(store: Arc<MemoryEventStore>) -> GatewayState {
    GatewayState {
        engine: Arc::new(AnalyticsEngine::new(store, AnalyticsSettings::default())),
        health: HealthState {
            start_time: Instant::now(),
            prometheus_render: None,
        },
    }
}

async fn get(state: GatewayState, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn funnel_route_wraps_result_in_envelope() {
    let store = Arc::new(MemoryEventStore::new(Seed::funnel_scenario()));
    let (status, body) = get(state_over(store), "/api/metrics/funnel").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let counts: Vec<u64> = body["data"]["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["count"].as_u64().unwrap())
        .collect();
    assert_eq!(counts, vec![2, 1, 1, 1, 1]);
    assert_eq!(body["data"]["overallConversionRate"], 50.0);
}

#[tokio::test]
async fn malformed_date_is_rejected_before_any_query() {
    let store = Arc::new(MemoryEventStore::new(Seed::funnel_scenario()));
    let (status, body) = get(
        state_over(store.clone()),
        "/api/metrics/funnel?startDate=last-tuesday",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn inverted_range_is_a_validation_error() {
    let store = Arc::new(MemoryEventStore::new(Seed::new()));
    let (status, body) = get(
        state_over(store),
        "/api/metrics/heatmap?startDate=2026-03-10&endDate=2026-03-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn store_failure_is_a_query_error_without_internals() {
    let store = Arc::new(MemoryEventStore::new(Seed::funnel_scenario()));
    store.fail_with("database disk image is malformed").await;
    let (status, body) = get(state_over(store), "/api/metrics/funnel?campaignId=c1").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "QUERY_ERROR");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("funnel"));
    assert!(message.contains("campaign=c1"));
    assert!(!message.contains("malformed"));
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn heatmap_with_dates_returns_full_grid() {
    let store = Arc::new(MemoryEventStore::new(Seed::heatmap_scenario()));
    let (status, body) = get(
        state_over(store),
        "/api/metrics/heatmap?startDate=2026-03-01&endDate=2026-03-31",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let grid = body["data"]["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 168);
    assert_eq!(grid[10]["contacts"], 2);
    assert_eq!(grid[10]["responses"], 1);
    assert_eq!(grid[10]["value"], 50.0);
    assert_eq!(body["data"]["maxValue"], 50.0);
}

#[tokio::test]
async fn trends_reject_unknown_interval() {
    let store = Arc::new(MemoryEventStore::new(Seed::new()));
    let (status, body) = get(state_over(store), "/api/metrics/trends?interval=hourly").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("hourly"));
}

#[tokio::test]
async fn weekly_trends_label_each_week() {
    let store = Arc::new(MemoryEventStore::new(Seed::funnel_scenario()));
    let (status, body) = get(
        state_over(store),
        "/api/metrics/trends?interval=weekly&startDate=2026-03-02&endDate=2026-03-15",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["interval"], "weekly");
    assert_eq!(body["data"]["labels"], serde_json::json!(["Mar 2", "Mar 9"]));
    assert_eq!(body["data"]["rawData"][0]["contacts"], 3);
}

#[tokio::test]
async fn vendors_route_carries_page_meta() {
    let mut seed = Seed::new();
    for i in 0..3 {
        seed = seed.vendor(vendor(&format!("v{i}"), &format!("Vendor {i}")));
    }
    let store = Arc::new(MemoryEventStore::new(seed));
    let (status, body) = get(state_over(store), "/api/vendors?pageSize=2&page=2&sortBy=name").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["meta"],
        serde_json::json!({"total": 3, "page": 2, "pageSize": 2, "totalPages": 2})
    );
}

#[tokio::test]
async fn oversized_page_is_rejected() {
    let store = Arc::new(MemoryEventStore::new(Seed::new()));
    let (status, _) = get(state_over(store), "/api/vendors?pageSize=5000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn conversations_list_and_single_thread() {
    let seed = Seed::new()
        .prospect(prospect("A", QualificationResult::Interested))
        .message(inbound("m1", "A", at(2026, 3, 2, 9, 0)));
    let store = Arc::new(MemoryEventStore::new(seed));

    let (status, body) = get(state_over(store.clone()), "/api/conversations?status=all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "A");
    assert_eq!(body["data"][0]["messageCount"], 1);

    let (status, body) = get(state_over(store.clone()), "/api/conversations?prospectId=A").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["messages"][0]["id"], "m1");

    let (status, body) = get(state_over(store), "/api/conversations?prospectId=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn overview_route_reports_totals() {
    let store = Arc::new(MemoryEventStore::new(Seed::funnel_scenario()));
    let (status, body) = get(state_over(store), "/api/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalContacted"], 2);
    assert_eq!(body["data"]["totalSmsResponses"], 1);
    assert_eq!(body["data"]["responseRate"], 50.0);
    assert!(body["data"].get("campaign").is_none());
}

#[tokio::test]
async fn health_reports_version_and_status() {
    let store = Arc::new(MemoryEventStore::new(Seed::new()));
    let (status, body) = get(state_over(store), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn metrics_endpoint_uses_renderer() {
    let store = Arc::new(MemoryEventStore::new(Seed::new()));
    let mut state = state_over(store);
    state.health.prometheus_render = Some(Arc::new(|| "reconnect_up 1\n".to_string()));
    let response = router(state)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"reconnect_up 1\n");
}
