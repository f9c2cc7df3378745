// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scatter-gather execution of every aggregation over an [`EventStore`].
//!
//! Each aggregation issues its store queries concurrently with
//! `tokio::try_join!`, every query under its own timeout. The first failure
//! aborts the call and drops the remaining queries; results are assembled
//! only after all queries succeed. Failures are wrapped in
//! [`ReconnectError::Aggregation`] naming the aggregator and scope.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use reconnect_core::types::{
    CampaignId, DateRange, MessageDirection, ProspectCountQuery, ProspectId, Scope, ThreadFilter,
};
use reconnect_core::{AggregatorKind, EventStore, ReconnectError};
use reconnect_prometheus::{AggregationOutcome, record_aggregation, record_query_timeout};
use tracing::{debug, error, warn};

use crate::conversations::{ConversationThread, ThreadListItem, ThreadProspect};
use crate::funnel::{FunnelResult, build_funnel};
use crate::heatmap::{HeatmapResult, build_heatmap};
use crate::overview::{OVERVIEW_TREND_DAYS, Overview, OverviewInputs, build_overview};
use crate::settings::AnalyticsSettings;
use crate::trends::{Interval, TrendInputs, TrendSeries, build_trends};
use crate::vendors::{VendorPage, VendorQuery, rank_vendors};

/// Stateless aggregation front end. Cheap to share behind an `Arc`.
pub struct AnalyticsEngine {
    store: Arc<dyn EventStore>,
    settings: AnalyticsSettings,
}

impl AnalyticsEngine {
    pub fn new(store: Arc<dyn EventStore>, settings: AnalyticsSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Run one store query under the configured timeout.
    async fn bounded<T>(
        &self,
        query: impl Future<Output = Result<T, ReconnectError>>,
    ) -> Result<T, ReconnectError> {
        let duration = self.settings.query_timeout;
        match tokio::time::timeout(duration, query).await {
            Ok(result) => result,
            Err(_) => {
                record_query_timeout();
                Err(ReconnectError::Timeout { duration })
            }
        }
    }

    /// Time, log, count, and tag one aggregation.
    async fn observe<T>(
        &self,
        aggregator: AggregatorKind,
        scope: String,
        work: impl Future<Output = Result<T, ReconnectError>>,
    ) -> Result<T, ReconnectError> {
        let started = Instant::now();
        let result = work.await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(_) => {
                debug!(
                    %aggregator,
                    scope = %scope,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "aggregation complete"
                );
                AggregationOutcome::Success
            }
            Err(e) => {
                match e.root() {
                    ReconnectError::Timeout { .. } => {
                        warn!(%aggregator, scope = %scope, error = %e, "aggregation timed out");
                    }
                    ReconnectError::Internal(_) => {
                        error!(%aggregator, scope = %scope, error = %e, "aggregation failed");
                    }
                    _ => {
                        warn!(%aggregator, scope = %scope, error = %e, "aggregation failed");
                    }
                }
                if matches!(e.root(), ReconnectError::Timeout { .. }) {
                    AggregationOutcome::Timeout
                } else {
                    AggregationOutcome::Error
                }
            }
        };
        record_aggregation(aggregator, outcome, elapsed.as_secs_f64());

        result.map_err(|source| ReconnectError::Aggregation {
            aggregator,
            scope,
            source: Box::new(source),
        })
    }

    /// Fill a missing range with the trailing default window ending at `now`.
    fn with_default_window(&self, scope: &Scope, now: DateTime<Utc>) -> Scope {
        match scope.range {
            Some(_) => scope.clone(),
            None => Scope::new(
                scope.campaign_id.clone(),
                Some(DateRange {
                    start: now - Duration::days(i64::from(self.settings.default_window_days)),
                    end: now,
                }),
            ),
        }
    }

    fn local_date(&self, at: &DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.settings.offset).date_naive()
    }

    /// Five-stage funnel. Each stage is counted independently.
    pub async fn funnel(&self, scope: &Scope) -> Result<FunnelResult, ReconnectError> {
        self.observe(AggregatorKind::Funnel, scope.to_string(), async {
            let count = move |query| self.bounded(self.store.count_distinct_prospects(query, scope));
            let (contacted, responded, engaged, qualified, notified) = tokio::try_join!(
                count(ProspectCountQuery::Contacted),
                count(ProspectCountQuery::Responded),
                count(ProspectCountQuery::Engaged),
                count(ProspectCountQuery::Qualified),
                count(ProspectCountQuery::Notified),
            )?;
            Ok(build_funnel([contacted, responded, engaged, qualified, notified]))
        })
        .await
    }

    /// Day/hour response-rate grid. A scope without a range uses the default window.
    pub async fn heatmap(&self, scope: &Scope) -> Result<HeatmapResult, ReconnectError> {
        let scope = self.with_default_window(scope, Utc::now());
        self.observe(AggregatorKind::Heatmap, scope.to_string(), async {
            let (attempts, responses) = tokio::try_join!(
                self.bounded(self.store.contact_attempts(&scope)),
                self.bounded(self.store.prospect_responses(&scope)),
            )?;
            Ok(build_heatmap(&attempts, &responses, self.settings.offset))
        })
        .await
    }

    /// Trend series. A scope without a range uses the default window.
    pub async fn trends(
        &self,
        interval: Interval,
        scope: &Scope,
    ) -> Result<TrendSeries, ReconnectError> {
        let scope = self.with_default_window(scope, Utc::now());
        self.observe(AggregatorKind::Trends, scope.to_string(), async {
            let range = scope
                .range
                .ok_or_else(|| ReconnectError::Internal("trend scope without range".into()))?;
            let (attempts, responses, inbound, reconnected) = tokio::try_join!(
                self.bounded(self.store.contact_attempts(&scope)),
                self.bounded(self.store.prospect_responses(&scope)),
                self.bounded(self.store.messages(&scope, Some(MessageDirection::Inbound))),
                self.bounded(self.store.reconnected_prospects(&scope)),
            )?;
            let inputs = TrendInputs {
                attempts: &attempts,
                responses: &responses,
                inbound: &inbound,
                reconnected: &reconnected,
            };
            Ok(build_trends(
                inputs,
                self.local_date(&range.start),
                self.local_date(&range.end),
                interval,
                self.settings.offset,
            ))
        })
        .await
    }

    /// Headline KPIs as of now.
    pub async fn overview(&self, campaign: Option<CampaignId>) -> Result<Overview, ReconnectError> {
        self.overview_at(campaign, Utc::now()).await
    }

    /// Headline KPIs with trend changes over the 14 local days ending at `now`.
    pub async fn overview_at(
        &self,
        campaign: Option<CampaignId>,
        now: DateTime<Utc>,
    ) -> Result<Overview, ReconnectError> {
        let scope = Scope::new(campaign, None);
        let trend_end = self.local_date(&now);
        let trend_start = trend_end - Duration::days(OVERVIEW_TREND_DAYS - 1);
        let trend_scope = Scope::new(
            scope.campaign_id.clone(),
            Some(DateRange {
                start: self
                    .settings
                    .offset
                    .from_local_datetime(&trend_start.and_time(NaiveTime::MIN))
                    .single()
                    .map(|at| at.with_timezone(&Utc))
                    .ok_or_else(|| ReconnectError::Internal("overview trend window".into()))?,
                end: now,
            }),
        );

        self.observe(AggregatorKind::Overview, scope.to_string(), async {
            let campaign_lookup = async {
                match &scope.campaign_id {
                    Some(id) => self.bounded(self.store.campaign(id)).await,
                    None => Ok(None),
                }
            };
            let (
                attempts,
                inbound,
                reconnected,
                trend_attempts,
                trend_responses,
                trend_inbound,
                trend_reconnected,
                campaign,
            ) = tokio::try_join!(
                self.bounded(self.store.contact_attempts(&scope)),
                self.bounded(self.store.messages(&scope, Some(MessageDirection::Inbound))),
                self.bounded(self.store.reconnected_prospects(&scope)),
                self.bounded(self.store.contact_attempts(&trend_scope)),
                self.bounded(self.store.prospect_responses(&trend_scope)),
                self.bounded(self.store.messages(&trend_scope, Some(MessageDirection::Inbound))),
                self.bounded(self.store.reconnected_prospects(&trend_scope)),
                campaign_lookup,
            )?;

            let trends = build_trends(
                TrendInputs {
                    attempts: &trend_attempts,
                    responses: &trend_responses,
                    inbound: &trend_inbound,
                    reconnected: &trend_reconnected,
                },
                trend_start,
                trend_end,
                Interval::Daily,
                self.settings.offset,
            )
            .changes;

            Ok(build_overview(
                OverviewInputs {
                    attempts: &attempts,
                    inbound: &inbound,
                    reconnected: &reconnected,
                },
                trends,
                campaign,
            ))
        })
        .await
    }

    /// One page of the vendor leaderboard.
    pub async fn vendors(&self, query: &VendorQuery) -> Result<VendorPage, ReconnectError> {
        let scope = format!(
            "sort={} {} page={} size={}",
            query.sort_by, query.order, query.page, query.page_size
        );
        self.observe(AggregatorKind::Vendors, scope, async {
            let aggregates = self.bounded(self.store.vendor_aggregates()).await?;
            Ok(rank_vendors(aggregates, query))
        })
        .await
    }

    /// Prospects with at least one message, most recent thread first.
    pub async fn threads(&self, filter: &ThreadFilter) -> Result<Vec<ThreadListItem>, ReconnectError> {
        let scope = format!(
            "status={} search={:?}",
            filter.status.as_ref().map_or("all", |s| s.as_str()),
            filter.search.as_deref().unwrap_or("")
        );
        self.observe(AggregatorKind::Conversations, scope, async {
            let summaries = self.bounded(self.store.thread_summaries(filter)).await?;
            Ok(summaries.into_iter().map(ThreadListItem::from).collect())
        })
        .await
    }

    /// One prospect's thread, oldest message first.
    pub async fn thread(&self, id: &ProspectId) -> Result<ConversationThread, ReconnectError> {
        self.observe(AggregatorKind::Conversations, format!("prospect={id}"), async {
            let (prospect, messages) = tokio::try_join!(
                self.bounded(self.store.prospect(id)),
                self.bounded(self.store.prospect_messages(id)),
            )?;
            let prospect =
                prospect.ok_or_else(|| ReconnectError::NotFound(format!("prospect {id}")))?;
            Ok(ConversationThread {
                prospect: ThreadProspect::from(&prospect),
                messages,
            })
        })
        .await
    }
}
