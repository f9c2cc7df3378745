// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from engine failures to HTTP responses.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reconnect_core::ReconnectError;
use thiserror::Error;
use tracing::error;

use crate::handlers::Envelope;

/// Client-facing failure. Never carries raw store error text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A store query failed or timed out. Safe to retry.
    #[error("{aggregator} query failed for {scope}")]
    Query { aggregator: String, scope: String },

    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Query { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Query { .. } => "QUERY_ERROR",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }
}

impl From<ReconnectError> for ApiError {
    fn from(err: ReconnectError) -> Self {
        let context = match &err {
            ReconnectError::Aggregation {
                aggregator, scope, ..
            } => Some((aggregator.to_string(), scope.clone())),
            _ => None,
        };
        match err.root() {
            ReconnectError::Validation(message) => ApiError::Validation(message.clone()),
            ReconnectError::NotFound(message) => ApiError::NotFound(message.clone()),
            ReconnectError::Storage { .. } | ReconnectError::Timeout { .. } => {
                let (aggregator, scope) =
                    context.unwrap_or_else(|| ("store".to_string(), "unscoped".to_string()));
                ApiError::Query { aggregator, scope }
            }
            _ => {
                error!(error = %err, "request failed with internal error");
                ApiError::Internal
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::failure(self.code(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
