// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headline KPIs for the dashboard hero.

use std::collections::HashSet;

use reconnect_core::types::{
    Campaign, ContactAttempt, Message, Prospect, ProspectId, QualificationResult,
};
use serde::Serialize;

use crate::rate::reconnection_rate;
use crate::trends::TrendChanges;

/// Days of history behind the overview trend changes (two 7-day periods).
pub const OVERVIEW_TREND_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_contacted: u64,
    pub total_sms_responses: u64,
    pub total_reconnected: u64,
    pub total_interested: u64,
    pub total_not_interested: u64,
    pub response_rate: f64,
    pub reconnection_rate: f64,
    pub trends: TrendChanges,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<Campaign>,
}

/// Scoped rows the overview is computed from.
#[derive(Debug, Clone, Copy)]
pub struct OverviewInputs<'a> {
    pub attempts: &'a [ContactAttempt],
    pub inbound: &'a [Message],
    pub reconnected: &'a [Prospect],
}

pub fn build_overview(
    inputs: OverviewInputs<'_>,
    trends: TrendChanges,
    campaign: Option<Campaign>,
) -> Overview {
    let contacted: HashSet<&ProspectId> = inputs.attempts.iter().map(|a| &a.prospect_id).collect();
    let responders: HashSet<&ProspectId> = inputs.inbound.iter().map(|m| &m.prospect_id).collect();
    let reconnected: HashSet<&ProspectId> = inputs.reconnected.iter().map(|p| &p.id).collect();
    let with_status = |status: QualificationResult| {
        inputs
            .reconnected
            .iter()
            .filter(|p| p.qualification_status == status)
            .count() as u64
    };

    Overview {
        total_contacted: contacted.len() as u64,
        total_sms_responses: inputs.inbound.len() as u64,
        total_reconnected: reconnected.len() as u64,
        total_interested: with_status(QualificationResult::Interested),
        total_not_interested: with_status(QualificationResult::NotInterested),
        response_rate: reconnection_rate(&contacted, &responders),
        reconnection_rate: reconnection_rate(&contacted, &reconnected),
        trends,
        campaign,
    }
}
