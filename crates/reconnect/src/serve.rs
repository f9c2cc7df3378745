// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reconnect serve` command implementation.
//!
//! Opens the event store, installs the metrics recorder, and serves the
//! dashboard API until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Instant;

use reconnect_analytics::{AnalyticsEngine, AnalyticsSettings};
use reconnect_config::ReconnectConfig;
use reconnect_core::{PluginAdapter, ReconnectError};
use reconnect_gateway::{GatewayState, HealthState, ServerConfig, start_server};
use reconnect_storage::SqliteEventStore;
use tracing::{debug, info, warn};

use crate::shutdown::shutdown_signal;

type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

pub async fn run_serve(config: ReconnectConfig) -> Result<(), ReconnectError> {
    info!(service = %config.service.name, "starting reconnect serve");

    let settings = AnalyticsSettings::from_config(&config.analytics)?;

    let store = Arc::new(SqliteEventStore::new(config.storage.clone()));
    store.initialize().await?;

    if !config.server.enabled {
        warn!("server.enabled is false, nothing to serve");
        store.shutdown().await?;
        return Ok(());
    }

    let prometheus_render = init_metrics(&config)?;
    let engine = Arc::new(AnalyticsEngine::new(store.clone(), settings));
    let state = GatewayState {
        engine,
        health: HealthState {
            start_time: Instant::now(),
            prometheus_render,
        },
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let served = start_server(&server_config, state, shutdown_signal()).await;

    // Checkpoint even when the server failed.
    store.shutdown().await?;
    served?;

    log_heap();
    info!("reconnect serve shutdown complete");
    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics(config: &ReconnectConfig) -> Result<Option<MetricsRender>, ReconnectError> {
    if !config.metrics.prometheus_enabled {
        debug!("prometheus metrics disabled");
        return Ok(None);
    }
    let adapter = reconnect_prometheus::PrometheusAdapter::new()?;
    Ok(Some(Arc::new(move || adapter.render())))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(_config: &ReconnectConfig) -> Result<Option<MetricsRender>, ReconnectError> {
    debug!("built without prometheus support");
    Ok(None)
}

#[cfg(not(target_env = "msvc"))]
fn log_heap() {
    if tikv_jemalloc_ctl::epoch::advance().is_ok()
        && let Ok(allocated) = tikv_jemalloc_ctl::stats::allocated::read()
    {
        debug!(allocated_mb = allocated / (1024 * 1024), "heap at shutdown");
    }
}

#[cfg(target_env = "msvc")]
fn log_heap() {}
