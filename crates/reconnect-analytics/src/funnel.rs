// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Five-stage conversion funnel.
//!
//! Each stage is an independent distinct-prospect count. Counts need not be
//! monotonic and percentages above 100 are reported as-is.

use reconnect_core::types::ProspectCountQuery;
use serde::Serialize;

use crate::rate::{CHART_DECIMALS, percentage};

/// One funnel stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub id: &'static str,
    pub name: &'static str,
    pub count: u64,
    /// Share of the first stage.
    pub percentage: f64,
    /// Share of the previous stage. The first stage is always 100.
    pub conversion_rate: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelResult {
    pub stages: Vec<FunnelStage>,
    pub overall_conversion_rate: f64,
}

/// Stable id, display name, and chart color of a stage.
fn stage_meta(query: ProspectCountQuery) -> (&'static str, &'static str, &'static str) {
    match query {
        ProspectCountQuery::Contacted => ("contacted", "Contacted", "#3b82f6"),
        ProspectCountQuery::Responded => ("callback_sms", "Callback/SMS", "#8b5cf6"),
        ProspectCountQuery::Engaged => ("engaged", "Engaged", "#f59e0b"),
        ProspectCountQuery::Qualified => ("qualified", "Qualified", "#10b981"),
        ProspectCountQuery::Notified => ("notified", "Vendor Notified", "#059669"),
    }
}

/// Build the funnel from stage counts in [`ProspectCountQuery::ALL`] order.
pub fn build_funnel(counts: [u64; 5]) -> FunnelResult {
    let first = counts[0];
    let stages = ProspectCountQuery::ALL
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (query, count))| {
            let (id, name, color) = stage_meta(*query);
            let (percentage, conversion_rate) = if i == 0 {
                (100.0, 100.0)
            } else {
                (
                    percentage(count, first, CHART_DECIMALS),
                    percentage(count, counts[i - 1], CHART_DECIMALS),
                )
            };
            FunnelStage {
                id,
                name,
                count,
                percentage,
                conversion_rate,
                color,
            }
        })
        .collect();

    FunnelResult {
        stages,
        overall_conversion_rate: percentage(counts[4], first, CHART_DECIMALS),
    }
}
