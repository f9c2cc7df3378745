// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Day-of-week by hour-of-day response-rate grid.
//!
//! Attempts are bucketed by their local weekday and hour in the configured
//! fixed offset. A contacted prospect counts as responding in a cell when it
//! has any response anywhere in the range, not necessarily in that cell.

use std::collections::HashSet;

use chrono::{Datelike, FixedOffset, Timelike, Weekday};
use reconnect_core::types::{ContactAttempt, ProspectId, ProspectResponse};
use serde::Serialize;

use crate::rate::{CHART_DECIMALS, percentage, round_to};

pub const DAYS: usize = 7;
pub const HOURS: usize = 24;

const DAY_NAMES: [&str; DAYS] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    /// 0 = Monday .. 6 = Sunday.
    pub day: u8,
    pub hour: u8,
    pub value: f64,
    pub contacts: u64,
    pub responses: u64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResult {
    /// Row-major by day, then hour.
    pub grid: Vec<HeatmapCell>,
    pub max_value: f64,
    pub min_value: f64,
    pub average_value: f64,
}

/// Monday-based day index.
pub fn day_index(weekday: Weekday) -> usize {
    // Sunday-based number shifted so Monday is 0 and Sunday is 6.
    (weekday.num_days_from_sunday() as usize + 6) % 7
}

/// Bucket attempts against the range-wide responded set.
pub fn build_heatmap(
    attempts: &[ContactAttempt],
    responses: &[ProspectResponse],
    offset: FixedOffset,
) -> HeatmapResult {
    let responded: HashSet<&ProspectId> = responses.iter().map(|r| &r.prospect_id).collect();

    let mut contacting: Vec<HashSet<&ProspectId>> = vec![HashSet::new(); DAYS * HOURS];
    let mut responding: Vec<HashSet<&ProspectId>> = vec![HashSet::new(); DAYS * HOURS];

    for attempt in attempts {
        let Some(sent_at) = attempt.sent_at else {
            continue;
        };
        let local = sent_at.with_timezone(&offset);
        let cell = day_index(local.weekday()) * HOURS + local.hour() as usize;
        contacting[cell].insert(&attempt.prospect_id);
        if responded.contains(&attempt.prospect_id) {
            responding[cell].insert(&attempt.prospect_id);
        }
    }

    let grid: Vec<HeatmapCell> = (0..DAYS * HOURS)
        .map(|cell| {
            let (day, hour) = (cell / HOURS, cell % HOURS);
            let contacts = contacting[cell].len() as u64;
            let responses = responding[cell].len() as u64;
            HeatmapCell {
                day: day as u8,
                hour: hour as u8,
                value: percentage(responses, contacts, CHART_DECIMALS),
                contacts,
                responses,
                label: format!("{} {hour:02}:00", DAY_NAMES[day]),
            }
        })
        .collect();

    let active: Vec<f64> = grid.iter().map(|c| c.value).filter(|v| *v > 0.0).collect();
    let (max_value, min_value, average_value) = if active.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let max = active.iter().copied().fold(f64::MIN, f64::max);
        let min = active.iter().copied().fold(f64::MAX, f64::min);
        let average = active.iter().sum::<f64>() / active.len() as f64;
        (max, min, round_to(average, CHART_DECIMALS))
    };

    HeatmapResult {
        grid,
        max_value,
        min_value,
        average_value,
    }
}
