// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outreach analytics aggregators.
//!
//! Every aggregator is a pure `build_*` function over typed event records,
//! fed by [`AnalyticsEngine`], which gathers the records from an
//! [`EventStore`](reconnect_core::EventStore) concurrently and under a
//! per-query timeout. Request parameter parsing lives in [`request`].

pub mod conversations;
pub mod engine;
pub mod funnel;
pub mod heatmap;
pub mod overview;
pub mod rate;
pub mod request;
pub mod settings;
pub mod trends;
pub mod vendors;

pub use conversations::{ConversationThread, ThreadListItem, ThreadProspect};
pub use engine::AnalyticsEngine;
pub use funnel::{FunnelResult, FunnelStage};
pub use heatmap::{HeatmapCell, HeatmapResult};
pub use overview::Overview;
pub use request::{
    ConversationParams, ConversationRequest, ScopeParams, TrendParams, VendorParams, Window,
};
pub use settings::AnalyticsSettings;
pub use trends::{Interval, TrendChanges, TrendSeries};
pub use vendors::{SortOrder, VendorPage, VendorPerformance, VendorQuery, VendorSortKey};
