// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranked, paginated vendor leaderboard.
//!
//! Ranking is done in-process over the full aggregate list so that the null
//! ordering and the vendor-id tie-break hold for every sort key.

use std::cmp::Ordering;

use reconnect_core::types::{VendorAggregate, VendorId};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::rate::rate_from_counts;

/// Leaderboard sort column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VendorSortKey {
    Name,
    TotalProspects,
    TotalResponses,
    InterestedProspects,
    #[default]
    ReconnectionRate,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A validated leaderboard request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorQuery {
    pub sort_by: VendorSortKey,
    pub order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl Default for VendorQuery {
    fn default() -> Self {
        Self {
            sort_by: VendorSortKey::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: 20,
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPerformance {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub vendor_email: String,
    pub total_prospects: u64,
    pub total_responses: u64,
    pub callbacks: u64,
    pub interested_prospects: u64,
    pub not_interested_prospects: u64,
    /// 0 when the vendor has no prospects.
    pub reconnection_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPage {
    pub vendors: Vec<VendorPerformance>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

/// Share of a vendor's prospects with a definite outcome, or `None` without prospects.
pub fn vendor_reconnection_rate(aggregate: &VendorAggregate) -> Option<f64> {
    (aggregate.total_prospects > 0).then(|| {
        rate_from_counts(
            aggregate.interested_prospects + aggregate.not_interested_prospects,
            aggregate.total_prospects,
        )
    })
}

struct Ranked {
    aggregate: VendorAggregate,
    rate: Option<f64>,
}

fn compare_key(a: &Ranked, b: &Ranked, key: VendorSortKey) -> Option<Ordering> {
    let (x, y) = (&a.aggregate, &b.aggregate);
    Some(match key {
        VendorSortKey::Name => x.vendor_name.cmp(&y.vendor_name),
        VendorSortKey::TotalProspects => x.total_prospects.cmp(&y.total_prospects),
        VendorSortKey::TotalResponses => x.total_responses.cmp(&y.total_responses),
        VendorSortKey::InterestedProspects => x.interested_prospects.cmp(&y.interested_prospects),
        VendorSortKey::ReconnectionRate => match (a.rate, b.rate) {
            (Some(ra), Some(rb)) => ra.total_cmp(&rb),
            // Null handling is order-independent; signal it to the caller.
            _ => return None,
        },
    })
}

fn rank_order(a: &Ranked, b: &Ranked, query: &VendorQuery) -> Ordering {
    let primary = match compare_key(a, b, query.sort_by) {
        Some(ordering) => match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        },
        // Nulls last in both directions.
        None => a.rate.is_none().cmp(&b.rate.is_none()),
    };
    primary.then_with(|| a.aggregate.vendor_id.cmp(&b.aggregate.vendor_id))
}

/// Sort, then cut one page. A page past the end is empty, not an error.
pub fn rank_vendors(aggregates: Vec<VendorAggregate>, query: &VendorQuery) -> VendorPage {
    let mut ranked: Vec<Ranked> = aggregates
        .into_iter()
        .map(|aggregate| Ranked {
            rate: vendor_reconnection_rate(&aggregate),
            aggregate,
        })
        .collect();
    ranked.sort_by(|a, b| rank_order(a, b, query));

    let total = ranked.len() as u64;
    let page_size = u64::from(query.page_size.max(1));
    let offset = u64::from(query.page.saturating_sub(1)) * page_size;
    let vendors = ranked
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(page_size as usize)
        .map(|r| VendorPerformance {
            reconnection_rate: r.rate.unwrap_or(0.0),
            vendor_id: r.aggregate.vendor_id,
            vendor_name: r.aggregate.vendor_name,
            vendor_email: r.aggregate.vendor_email,
            total_prospects: r.aggregate.total_prospects,
            total_responses: r.aggregate.total_responses,
            callbacks: r.aggregate.callbacks,
            interested_prospects: r.aggregate.interested_prospects,
            not_interested_prospects: r.aggregate.not_interested_prospects,
        })
        .collect();

    VendorPage {
        vendors,
        total,
        page: query.page,
        page_size: query.page_size,
        total_pages: total.div_ceil(page_size),
    }
}
