// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route handlers for the dashboard API.
//!
//! Parameters are resolved into typed scopes before the engine is called, so
//! a malformed request never reaches the store.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use reconnect_analytics::request::{
    ConversationParams, ConversationRequest, ScopeParams, TrendParams, VendorParams, Window,
};
use reconnect_analytics::{
    FunnelResult, HeatmapResult, Overview, TrendSeries, VendorPage, VendorPerformance,
};
use reconnect_core::{HealthStatus, PluginAdapter};
use serde::Serialize;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Response envelope shared by every `/api` route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Pagination block of the vendor leaderboard.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    pub fn failure(code: &'static str, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody { code, message }),
            meta: None,
        }
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// GET /api/metrics
pub async fn get_overview(
    State(state): State<GatewayState>,
    params: Result<Query<ScopeParams>, QueryRejection>,
) -> ApiResult<Overview> {
    let Query(params) = params?;
    let overview = state.engine.overview(params.campaign()).await?;
    Ok(Json(Envelope::ok(overview)))
}

/// GET /api/metrics/funnel
pub async fn get_funnel(
    State(state): State<GatewayState>,
    params: Result<Query<ScopeParams>, QueryRejection>,
) -> ApiResult<FunnelResult> {
    let Query(params) = params?;
    let scope = params.resolve(Window::Optional, Utc::now(), state.engine.settings())?;
    let funnel = state.engine.funnel(&scope).await?;
    Ok(Json(Envelope::ok(funnel)))
}

/// GET /api/metrics/heatmap
///
/// Without dates, covers the trailing default window.
pub async fn get_heatmap(
    State(state): State<GatewayState>,
    params: Result<Query<ScopeParams>, QueryRejection>,
) -> ApiResult<HeatmapResult> {
    let Query(params) = params?;
    let settings = state.engine.settings();
    let window = Window::Trailing {
        days: settings.default_window_days,
    };
    let scope = params.resolve(window, Utc::now(), settings)?;
    let heatmap = state.engine.heatmap(&scope).await?;
    Ok(Json(Envelope::ok(heatmap)))
}

/// GET /api/metrics/trends
pub async fn get_trends(
    State(state): State<GatewayState>,
    params: Result<Query<TrendParams>, QueryRejection>,
) -> ApiResult<TrendSeries> {
    let Query(params) = params?;
    let (interval, scope) = params.resolve(Utc::now(), state.engine.settings())?;
    let series = state.engine.trends(interval, &scope).await?;
    Ok(Json(Envelope::ok(series)))
}

/// GET /api/vendors
pub async fn get_vendors(
    State(state): State<GatewayState>,
    params: Result<Query<VendorParams>, QueryRejection>,
) -> ApiResult<Vec<VendorPerformance>> {
    let Query(params) = params?;
    let query = params.resolve(state.engine.settings())?;
    let VendorPage {
        vendors,
        total,
        page,
        page_size,
        total_pages,
    } = state.engine.vendors(&query).await?;
    Ok(Json(Envelope {
        meta: Some(PageMeta {
            total,
            page,
            page_size,
            total_pages,
        }),
        ..Envelope::ok(vendors)
    }))
}

/// GET /api/conversations
///
/// With `prospectId`, one full thread; otherwise the thread list.
pub async fn get_conversations(
    State(state): State<GatewayState>,
    params: Result<Query<ConversationParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let response = match params.resolve() {
        ConversationRequest::Thread(id) => {
            let thread = state.engine.thread(&id).await?;
            Json(Envelope::ok(thread)).into_response()
        }
        ConversationRequest::List(filter) => {
            let threads = state.engine.threads(&filter).await?;
            Json(Envelope::ok(threads)).into_response()
        }
    };
    Ok(response)
}

/// Body of GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /health
///
/// Probes the event store. 503 when it is unreachable.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let (code, status, detail) = match state.engine.store().health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok", None),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, "degraded", Some(reason)),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
        Err(e) => {
            tracing::warn!(error = %e, "health probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", None)
        }
    };
    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        detail,
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
