// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any installed recorder collects these.
//! Without a recorder every call is a no-op.

use metrics::{describe_counter, describe_histogram};
use reconnect_core::AggregatorKind;

/// How an aggregation call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationOutcome {
    Success,
    Error,
    Timeout,
}

impl AggregationOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationOutcome::Success => "success",
            AggregationOutcome::Error => "error",
            AggregationOutcome::Timeout => "timeout",
        }
    }
}

/// Register all Reconnect metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "reconnect_aggregations_total",
        "Aggregation calls by aggregator and outcome"
    );
    describe_histogram!(
        "reconnect_aggregation_latency_seconds",
        "Wall-clock latency of one aggregation call in seconds"
    );
    describe_counter!(
        "reconnect_store_query_timeouts_total",
        "Event store queries that exceeded the query timeout"
    );
}

/// Record one finished aggregation call.
pub fn record_aggregation(aggregator: AggregatorKind, outcome: AggregationOutcome, seconds: f64) {
    metrics::counter!(
        "reconnect_aggregations_total",
        "aggregator" => aggregator.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    metrics::histogram!(
        "reconnect_aggregation_latency_seconds",
        "aggregator" => aggregator.to_string()
    )
    .record(seconds);
}

/// Record a store query that hit its timeout.
pub fn record_query_timeout() {
    metrics::counter!("reconnect_store_query_timeouts_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn aggregation_metrics_render_with_labels() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            register_metrics();
            record_aggregation(AggregatorKind::Heatmap, AggregationOutcome::Success, 0.012);
            record_aggregation(AggregatorKind::Heatmap, AggregationOutcome::Timeout, 10.0);
            record_query_timeout();
        });

        let rendered = handle.render();
        assert!(rendered.contains(
            "reconnect_aggregations_total{aggregator=\"heatmap\",outcome=\"success\"} 1"
        ));
        assert!(rendered.contains("outcome=\"timeout\""));
        assert!(rendered.contains("reconnect_store_query_timeouts_total 1"));
        assert!(rendered.contains("reconnect_aggregation_latency_seconds"));
    }

    #[test]
    fn recording_without_recorder_is_a_noop() {
        record_aggregation(AggregatorKind::Funnel, AggregationOutcome::Error, 0.1);
        record_query_timeout();
    }
}
