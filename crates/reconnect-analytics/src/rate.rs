// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Percentage arithmetic shared by every aggregator.
//!
//! All divisions guard a zero denominator by returning 0, so no output value
//! is ever NaN or infinite.

use std::collections::HashSet;
use std::hash::Hash;

/// Decimal places of headline rates.
pub const RATE_DECIMALS: u32 = 2;

/// Decimal places of funnel, heatmap, and trend values.
pub const CHART_DECIMALS: u32 = 1;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `100 * numerator / denominator`, rounded, or 0 when the denominator is 0.
pub fn percentage(numerator: u64, denominator: u64, decimals: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round_to(100.0 * numerator as f64 / denominator as f64, decimals)
}

/// Share of `contacted` that `responded`, as a percentage.
///
/// `responded` is not intersected with `contacted`: a responder who was never
/// contacted in scope still counts, so the result may exceed 100.
pub fn reconnection_rate<T: Eq + Hash>(contacted: &HashSet<T>, responded: &HashSet<T>) -> f64 {
    percentage(responded.len() as u64, contacted.len() as u64, RATE_DECIMALS)
}

/// Count-based form of [`reconnection_rate`].
pub fn rate_from_counts(numerator: u64, denominator: u64) -> f64 {
    percentage(numerator, denominator, RATE_DECIMALS)
}

/// Relative change from `previous` to `recent` in percent, 0 when `previous` is 0.
pub fn change_percent(recent: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    round_to(100.0 * (recent - previous) / previous, CHART_DECIMALS)
}
