// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reconnect report` command: one aggregation printed as JSON.
//!
//! Flags go through the same parameter resolution as the HTTP routes, so a
//! report and the matching request always agree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use reconnect_analytics::request::{
    ConversationParams, ConversationRequest, ScopeParams, TrendParams, VendorParams, Window,
};
use reconnect_analytics::{AnalyticsEngine, AnalyticsSettings};
use reconnect_config::ReconnectConfig;
use reconnect_core::{PluginAdapter, ReconnectError};
use reconnect_storage::SqliteEventStore;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Overview,
    Funnel,
    Heatmap,
    Trends,
    Vendors,
    Conversations,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Aggregation to run.
    #[arg(value_enum)]
    pub kind: ReportKind,

    #[arg(long)]
    pub campaign_id: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD.
    #[arg(long)]
    pub start_date: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD.
    #[arg(long)]
    pub end_date: Option<String>,
    /// daily or weekly (trends only).
    #[arg(long)]
    pub interval: Option<String>,

    #[arg(long)]
    pub sort_by: Option<String>,
    #[arg(long)]
    pub sort_order: Option<String>,
    #[arg(long)]
    pub page: Option<String>,
    #[arg(long)]
    pub page_size: Option<String>,

    #[arg(long)]
    pub prospect_id: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub search: Option<String>,

    /// Print single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

impl ReportArgs {
    fn scope(&self) -> ScopeParams {
        ScopeParams {
            campaign_id: self.campaign_id.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

fn to_value(result: &impl Serialize) -> Result<Value, ReconnectError> {
    serde_json::to_value(result)
        .map_err(|e| ReconnectError::Internal(format!("report serialization failed: {e}")))
}

/// Run the requested aggregation as of `now`.
pub async fn build_report(
    engine: &AnalyticsEngine,
    args: &ReportArgs,
    now: DateTime<Utc>,
) -> Result<Value, ReconnectError> {
    let settings = engine.settings();
    match args.kind {
        ReportKind::Overview => to_value(&engine.overview_at(args.scope().campaign(), now).await?),
        ReportKind::Funnel => {
            let scope = args.scope().resolve(Window::Optional, now, settings)?;
            to_value(&engine.funnel(&scope).await?)
        }
        ReportKind::Heatmap => {
            let window = Window::Trailing {
                days: settings.default_window_days,
            };
            let scope = args.scope().resolve(window, now, settings)?;
            to_value(&engine.heatmap(&scope).await?)
        }
        ReportKind::Trends => {
            let params = TrendParams {
                scope: args.scope(),
                interval: args.interval.clone(),
            };
            let (interval, scope) = params.resolve(now, settings)?;
            to_value(&engine.trends(interval, &scope).await?)
        }
        ReportKind::Vendors => {
            let params = VendorParams {
                sort_by: args.sort_by.clone(),
                sort_order: args.sort_order.clone(),
                page: args.page.clone(),
                page_size: args.page_size.clone(),
            };
            to_value(&engine.vendors(&params.resolve(settings)?).await?)
        }
        ReportKind::Conversations => {
            let params = ConversationParams {
                prospect_id: args.prospect_id.clone(),
                status: args.status.clone(),
                search: args.search.clone(),
            };
            match params.resolve() {
                ConversationRequest::Thread(id) => to_value(&engine.thread(&id).await?),
                ConversationRequest::List(filter) => to_value(&engine.threads(&filter).await?),
            }
        }
    }
}

pub async fn run_report(config: ReconnectConfig, args: ReportArgs) -> Result<(), ReconnectError> {
    let settings = AnalyticsSettings::from_config(&config.analytics)?;
    let store = Arc::new(SqliteEventStore::new(config.storage.clone()));
    store.initialize().await?;
    let engine = AnalyticsEngine::new(store.clone(), settings);

    let report = build_report(&engine, &args, Utc::now()).await;
    store.shutdown().await?;
    let report = report?;

    let rendered = if args.compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .map_err(|e| ReconnectError::Internal(format!("report serialization failed: {e}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use reconnect_test_utils::fixtures::at;
    use reconnect_test_utils::{MemoryEventStore, Seed};

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ReportArgs,
    }

    fn args(argv: &[&str]) -> ReportArgs {
        let mut full = vec!["report"];
        full.extend_from_slice(argv);
        Wrapper::try_parse_from(full).unwrap().args
    }

    fn engine(seed: Seed) -> AnalyticsEngine {
        AnalyticsEngine::new(
            Arc::new(MemoryEventStore::new(seed)),
            AnalyticsSettings::default(),
        )
    }

    #[tokio::test]
    async fn funnel_report_matches_route_shape() {
        let engine = engine(Seed::funnel_scenario());
        let value = build_report(&engine, &args(&["funnel"]), at(2026, 3, 31, 0, 0))
            .await
            .unwrap();
        assert_eq!(value["stages"][0]["count"], 2);
        assert_eq!(value["overallConversionRate"], 50.0);
    }

    #[tokio::test]
    async fn heatmap_report_defaults_to_trailing_window() {
        let engine = engine(Seed::heatmap_scenario());
        // 2026-03-20 is within 30 days of the Monday scenario.
        let value = build_report(&engine, &args(&["heatmap"]), at(2026, 3, 20, 0, 0))
            .await
            .unwrap();
        assert_eq!(value["grid"][10]["contacts"], 2);

        // Two months later the scenario falls outside the default window.
        let value = build_report(&engine, &args(&["heatmap"]), at(2026, 5, 20, 0, 0))
            .await
            .unwrap();
        assert_eq!(value["maxValue"], 0.0);
    }

    #[tokio::test]
    async fn invalid_flag_values_are_validation_errors() {
        let engine = engine(Seed::new());
        let err = build_report(
            &engine,
            &args(&["vendors", "--sort-order", "sideways"]),
            at(2026, 3, 31, 0, 0),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReconnectError::Validation(_)));
    }

    #[test]
    fn unknown_report_kind_is_rejected_by_clap() {
        assert!(Wrapper::try_parse_from(["report", "churn"]).is_err());
    }
}
