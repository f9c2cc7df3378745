// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw request parameters and their validation.
//!
//! Every parameter arrives as an optional string. Resolution turns them into
//! typed scopes and queries, or a `Validation` error before any store query
//! is issued. Empty strings are treated as absent.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use reconnect_core::types::{CampaignId, DateRange, ProspectId, QualificationResult, Scope, ThreadFilter};
use reconnect_core::ReconnectError;
use serde::Deserialize;

use crate::settings::AnalyticsSettings;
use crate::trends::Interval;
use crate::vendors::{SortOrder, VendorQuery, VendorSortKey};

/// Longest accepted trend window, in days.
pub const MAX_TREND_DAYS: i64 = 3660;

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn invalid(message: impl Into<String>) -> ReconnectError {
    ReconnectError::Validation(message.into())
}

/// Which side of a range a date-only value fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// 00:00:00.000 local.
    Start,
    /// 23:59:59.999 local.
    End,
}

/// Parse an RFC 3339 timestamp, or a `YYYY-MM-DD` date expanded to the start
/// or end of that local day.
pub fn parse_instant(
    raw: &str,
    bound: Bound,
    settings: &AnalyticsSettings,
) -> Result<DateTime<Utc>, ReconnectError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| invalid(format!("'{raw}' is not an RFC 3339 timestamp or YYYY-MM-DD date")))?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| ReconnectError::Internal("end-of-day time".into()))?,
    };
    settings
        .offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| invalid(format!("'{raw}' does not map to a single instant")))
}

/// Lower bound used when only an end date is given.
fn open_start() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Upper bound used when only a start date is given: 9999-12-31T23:59:59.999Z.
fn open_end() -> DateTime<Utc> {
    DateTime::from_timestamp(253_402_300_799, 999_000_000).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// How a missing date range is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// No dates means no range; one date leaves the other side open.
    Optional,
    /// Missing end is `now`; missing start is `days` before the end.
    Trailing { days: u32 },
}

/// Campaign and date filters shared by the metric endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeParams {
    pub campaign_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ScopeParams {
    pub fn campaign(&self) -> Option<CampaignId> {
        present(&self.campaign_id).map(CampaignId::from)
    }

    pub fn resolve(
        &self,
        window: Window,
        now: DateTime<Utc>,
        settings: &AnalyticsSettings,
    ) -> Result<Scope, ReconnectError> {
        let start = present(&self.start_date)
            .map(|raw| parse_instant(raw, Bound::Start, settings))
            .transpose()?;
        let end = present(&self.end_date)
            .map(|raw| parse_instant(raw, Bound::End, settings))
            .transpose()?;

        let range = match (window, start, end) {
            (Window::Optional, None, None) => None,
            (Window::Optional, start, end) => Some(DateRange {
                start: start.unwrap_or_else(open_start),
                end: end.unwrap_or_else(open_end),
            }),
            (Window::Trailing { days }, start, end) => {
                let end = end.unwrap_or(now);
                let start = start.unwrap_or(end - Duration::days(i64::from(days)));
                Some(DateRange { start, end })
            }
        };

        if let Some(range) = &range
            && range.start > range.end
        {
            return Err(invalid(format!(
                "startDate {} is after endDate {}",
                range.start.to_rfc3339(),
                range.end.to_rfc3339()
            )));
        }
        Ok(Scope::new(self.campaign(), range))
    }
}

/// Trend request: scope plus bucket interval.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendParams {
    #[serde(flatten)]
    pub scope: ScopeParams,
    pub interval: Option<String>,
}

impl TrendParams {
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        settings: &AnalyticsSettings,
    ) -> Result<(Interval, Scope), ReconnectError> {
        let interval = match present(&self.interval) {
            None => Interval::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid(format!("interval must be daily or weekly, got '{raw}'")))?,
        };
        let scope = self.scope.resolve(
            Window::Trailing {
                days: settings.default_window_days,
            },
            now,
            settings,
        )?;
        if let Some(range) = &scope.range
            && (range.end - range.start).num_days() > MAX_TREND_DAYS
        {
            return Err(invalid(format!(
                "trend window exceeds {MAX_TREND_DAYS} days"
            )));
        }
        Ok((interval, scope))
    }
}

/// Vendor leaderboard request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl VendorParams {
    pub fn resolve(&self, settings: &AnalyticsSettings) -> Result<VendorQuery, ReconnectError> {
        let sort_by = match present(&self.sort_by) {
            None => VendorSortKey::default(),
            Some(raw) => raw.parse().map_err(|_| {
                invalid(format!(
                    "sortBy must be one of name, total_prospects, total_responses, \
                     interested_prospects, reconnection_rate; got '{raw}'"
                ))
            })?,
        };
        let order = match present(&self.sort_order) {
            None => SortOrder::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| invalid(format!("sortOrder must be asc or desc, got '{raw}'")))?,
        };
        let page = match present(&self.page) {
            None => 1,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| invalid(format!("page must be an integer >= 1, got '{raw}'")))?,
        };
        let max = settings.max_page_size;
        let page_size = match present(&self.page_size) {
            None => settings.default_page_size,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|s| (1..=max).contains(s))
                .ok_or_else(|| {
                    invalid(format!("pageSize must be between 1 and {max}, got '{raw}'"))
                })?,
        };
        Ok(VendorQuery {
            sort_by,
            order,
            page,
            page_size,
        })
    }
}

/// Conversation request: a single thread when `prospectId` is given, else the list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationParams {
    pub prospect_id: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationRequest {
    List(ThreadFilter),
    Thread(ProspectId),
}

impl ConversationParams {
    pub fn resolve(&self) -> ConversationRequest {
        if let Some(id) = present(&self.prospect_id) {
            return ConversationRequest::Thread(ProspectId::from(id));
        }
        let status = present(&self.status)
            .filter(|s| !s.eq_ignore_ascii_case("all"))
            .map(QualificationResult::from_str_value);
        ConversationRequest::List(ThreadFilter {
            status,
            search: present(&self.search).map(str::to_string),
        })
    }
}
