// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime settings derived from `[analytics]` configuration.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use reconnect_config::model::AnalyticsConfig;
use reconnect_core::ReconnectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsSettings {
    /// Budget for each individual store query.
    pub query_timeout: Duration,
    pub default_window_days: u32,
    /// Bucketing timezone.
    pub offset: FixedOffset,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl AnalyticsSettings {
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, ReconnectError> {
        let offset = config.bucket_offset().ok_or_else(|| {
            ReconnectError::Config(format!(
                "analytics.utc_offset_minutes {} is not a valid UTC offset",
                config.utc_offset_minutes
            ))
        })?;
        Ok(Self {
            query_timeout: Duration::from_secs(config.query_timeout_secs),
            default_window_days: config.default_window_days,
            offset,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        })
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(10),
            default_window_days: 30,
            offset: Utc.fix(),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}
