// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the analytics dashboard.
//!
//! Every aggregation is exposed as a `GET` route returning camelCase JSON in
//! a `{success, data, error?, meta?}` envelope. Handlers are thin: they
//! resolve query parameters, call the [`AnalyticsEngine`], and map failures
//! through [`ApiError`].
//!
//! [`AnalyticsEngine`]: reconnect_analytics::AnalyticsEngine

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
