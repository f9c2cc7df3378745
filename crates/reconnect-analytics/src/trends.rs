// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily and weekly trend series with period-over-period change.
//!
//! Buckets are computed from raw events per local calendar day. Every day of
//! the window is present, zero-filled, so all datasets share one axis. Weekly
//! buckets sum their days and recompute the rate from the summed counts.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use reconnect_core::types::{
    ContactAttempt, Message, Prospect, ProspectId, ProspectResponse, ResponseType,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::heatmap::day_index;
use crate::rate::{CHART_DECIMALS, change_percent, percentage, rate_from_counts};

/// Bucket width of a trend series.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
}

impl Interval {
    /// Buckets compared on each side of a period-over-period change.
    pub fn change_window(self) -> usize {
        match self {
            Interval::Daily => 7,
            Interval::Weekly => 1,
        }
    }
}

/// One bucket of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// First local day of the bucket.
    pub date: NaiveDate,
    pub contacts: u64,
    pub callbacks: u64,
    pub sms_responses: u64,
    pub reconnected: u64,
    pub reconnection_rate: f64,
}

impl TrendPoint {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            contacts: 0,
            callbacks: 0,
            sms_responses: 0,
            reconnected: 0,
            reconnection_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendDataset {
    pub id: &'static str,
    pub label: &'static str,
    pub data: Vec<u64>,
    pub color: &'static str,
}

/// Period-over-period change in percent for each series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChanges {
    pub contacted_change: f64,
    pub callbacks_change: f64,
    pub sms_responses_change: f64,
    pub reconnected_change: f64,
    pub rate_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub interval: Interval,
    pub labels: Vec<String>,
    pub datasets: Vec<TrendDataset>,
    pub raw_data: Vec<TrendPoint>,
    pub changes: TrendChanges,
}

/// Scoped rows a series is computed from.
///
/// `reconnected` is bucketed by `updated_at`, the closest record the store
/// keeps of when a prospect's status was set.
#[derive(Debug, Clone, Copy)]
pub struct TrendInputs<'a> {
    pub attempts: &'a [ContactAttempt],
    pub responses: &'a [ProspectResponse],
    pub inbound: &'a [Message],
    pub reconnected: &'a [Prospect],
}

#[derive(Default)]
struct DayBucket<'a> {
    contacts: HashSet<&'a ProspectId>,
    callbacks: HashSet<&'a ProspectId>,
    sms_responses: u64,
    reconnected: u64,
}

/// Build the series over the local days `start..=end`.
pub fn build_trends(
    inputs: TrendInputs<'_>,
    start: NaiveDate,
    end: NaiveDate,
    interval: Interval,
    offset: FixedOffset,
) -> TrendSeries {
    let mut days: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();
    let mut day = start;
    while day <= end {
        days.insert(day, DayBucket::default());
        day += Duration::days(1);
    }

    let local_day = |at: &chrono::DateTime<chrono::Utc>| at.with_timezone(&offset).date_naive();

    for attempt in inputs.attempts {
        if let Some(bucket) = attempt.sent_at.as_ref().and_then(|at| days.get_mut(&local_day(at))) {
            bucket.contacts.insert(&attempt.prospect_id);
        }
    }
    for response in inputs
        .responses
        .iter()
        .filter(|r| r.response_type == ResponseType::Callback)
    {
        if let Some(bucket) = response
            .received_at
            .as_ref()
            .and_then(|at| days.get_mut(&local_day(at)))
        {
            bucket.callbacks.insert(&response.prospect_id);
        }
    }
    for message in inputs.inbound {
        if let Some(bucket) = message.sent_at.as_ref().and_then(|at| days.get_mut(&local_day(at))) {
            bucket.sms_responses += 1;
        }
    }
    for prospect in inputs.reconnected {
        if let Some(bucket) = prospect
            .updated_at
            .as_ref()
            .and_then(|at| days.get_mut(&local_day(at)))
        {
            bucket.reconnected += 1;
        }
    }

    let daily: Vec<TrendPoint> = days
        .into_iter()
        .map(|(date, bucket)| TrendPoint {
            date,
            contacts: bucket.contacts.len() as u64,
            callbacks: bucket.callbacks.len() as u64,
            sms_responses: bucket.sms_responses,
            reconnected: bucket.reconnected,
            reconnection_rate: 0.0,
        })
        .collect();

    let mut points = match interval {
        Interval::Daily => daily,
        Interval::Weekly => fold_weeks(daily),
    };
    for point in &mut points {
        point.reconnection_rate = percentage(point.reconnected, point.contacts, CHART_DECIMALS);
    }

    let changes = period_changes(&points, interval.change_window());
    let labels = points
        .iter()
        .map(|p| p.date.format("%b %-d").to_string())
        .collect();
    let datasets = vec![
        dataset("contacts", "Contacts", "#3B82F6", &points, |p| p.contacts),
        dataset("callbacks", "Callbacks", "#10B981", &points, |p| p.callbacks),
        dataset("smsResponses", "SMS Responses", "#F59E0B", &points, |p| {
            p.sms_responses
        }),
        dataset("reconnected", "Reconnected", "#8B5CF6", &points, |p| {
            p.reconnected
        }),
    ];

    TrendSeries {
        interval,
        labels,
        datasets,
        raw_data: points,
        changes,
    }
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(day_index(date.weekday()) as i64)
}

fn fold_weeks(daily: Vec<TrendPoint>) -> Vec<TrendPoint> {
    let mut weeks: BTreeMap<NaiveDate, TrendPoint> = BTreeMap::new();
    for day in daily {
        let monday = week_start(day.date);
        let week = weeks
            .entry(monday)
            .or_insert_with(|| TrendPoint::empty(monday));
        week.contacts += day.contacts;
        week.callbacks += day.callbacks;
        week.sms_responses += day.sms_responses;
        week.reconnected += day.reconnected;
    }
    weeks.into_values().collect()
}

fn dataset(
    id: &'static str,
    label: &'static str,
    color: &'static str,
    points: &[TrendPoint],
    value: impl Fn(&TrendPoint) -> u64,
) -> TrendDataset {
    TrendDataset {
        id,
        label,
        data: points.iter().map(value).collect(),
        color,
    }
}

#[derive(Default)]
struct Totals {
    contacts: u64,
    callbacks: u64,
    sms_responses: u64,
    reconnected: u64,
}

impl Totals {
    fn of(points: &[TrendPoint]) -> Self {
        points.iter().fold(Self::default(), |acc, p| Self {
            contacts: acc.contacts + p.contacts,
            callbacks: acc.callbacks + p.callbacks,
            sms_responses: acc.sms_responses + p.sms_responses,
            reconnected: acc.reconnected + p.reconnected,
        })
    }

    fn rate(&self) -> f64 {
        rate_from_counts(self.reconnected, self.contacts)
    }
}

/// Compare the last `window` buckets against the `window` before them.
pub fn period_changes(points: &[TrendPoint], window: usize) -> TrendChanges {
    let split = points.len().saturating_sub(window);
    let recent = Totals::of(&points[split..]);
    let previous = Totals::of(&points[split.saturating_sub(window)..split]);
    TrendChanges {
        contacted_change: change_percent(recent.contacts as f64, previous.contacts as f64),
        callbacks_change: change_percent(recent.callbacks as f64, previous.callbacks as f64),
        sms_responses_change: change_percent(
            recent.sms_responses as f64,
            previous.sms_responses as f64,
        ),
        reconnected_change: change_percent(recent.reconnected as f64, previous.reconnected as f64),
        rate_change: change_percent(recent.rate(), previous.rate()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;
    use reconnect_core::types::{AttemptType, MessageDirection, QualificationResult};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn attempt(prospect: &str, day: u32) -> ContactAttempt {
        ContactAttempt {
            id: format!("a-{prospect}-{day}"),
            prospect_id: prospect.into(),
            campaign_id: None,
            attempt_type: AttemptType::Sms,
            status: "sent".into(),
            sent_at: Some(at(day, 10)),
            cost_amount: None,
        }
    }

    fn inbound(prospect: &str, day: u32) -> Message {
        Message {
            id: format!("m-{prospect}-{day}"),
            prospect_id: prospect.into(),
            campaign_id: None,
            direction: MessageDirection::Inbound,
            content: "ok".into(),
            sent_at: Some(at(day, 11)),
            delivery_status: None,
            delivered_at: None,
            read_at: None,
        }
    }

    fn callback(prospect: &str, day: u32) -> ProspectResponse {
        ProspectResponse {
            id: format!("r-{prospect}-{day}"),
            prospect_id: prospect.into(),
            campaign_id: None,
            response_type: ResponseType::Callback,
            qualification_result: QualificationResult::Interested,
            received_at: Some(at(day, 12)),
            requires_followup: true,
        }
    }

    fn reconnected(prospect: &str, day: u32) -> Prospect {
        Prospect {
            id: prospect.into(),
            firstname: None,
            lastname: None,
            company: None,
            phone: "+32".into(),
            language: "nl".into(),
            qualification_status: QualificationResult::Interested,
            last_contact_date: None,
            vendor_id: None,
            updated_at: Some(at(day, 13)),
        }
    }

    #[test]
    fn every_day_in_window_is_present() {
        let attempts = [attempt("A", 3)];
        let inputs = TrendInputs {
            attempts: &attempts,
            responses: &[],
            inbound: &[],
            reconnected: &[],
        };
        let series = build_trends(inputs, date(1), date(5), Interval::Daily, utc());
        assert_eq!(series.labels, vec!["Mar 1", "Mar 2", "Mar 3", "Mar 4", "Mar 5"]);
        assert_eq!(series.datasets[0].data, vec![0, 0, 1, 0, 0]);
        assert!(series.datasets.iter().all(|d| d.data.len() == 5));
    }

    #[test]
    fn daily_buckets_dedupe_contacts_but_count_messages() {
        let attempts = [attempt("A", 2), attempt("A", 2), attempt("B", 2)];
        let inbound = [inbound("A", 2), inbound("A", 2)];
        let responses = [callback("A", 2)];
        let reconnected = [reconnected("A", 2)];
        let inputs = TrendInputs {
            attempts: &attempts,
            responses: &responses,
            inbound: &inbound,
            reconnected: &reconnected,
        };
        let series = build_trends(inputs, date(2), date(2), Interval::Daily, utc());
        let point = &series.raw_data[0];
        assert_eq!(
            (point.contacts, point.callbacks, point.sms_responses, point.reconnected),
            (2, 1, 2, 1)
        );
        assert_eq!(point.reconnection_rate, 50.0);
    }

    #[test]
    fn weekly_rate_is_recomputed_from_sums() {
        // Mon 2nd: 1 contact, 1 reconnected (100%). Tue 3rd: 3 contacts, 0 reconnected (0%).
        // An average of daily rates would give 50; the summed rate is 25.
        let attempts = [attempt("A", 2), attempt("B", 3), attempt("C", 3), attempt("D", 3)];
        let reconnected = [reconnected("A", 2)];
        let inputs = TrendInputs {
            attempts: &attempts,
            responses: &[],
            inbound: &[],
            reconnected: &reconnected,
        };
        let series = build_trends(inputs, date(2), date(8), Interval::Weekly, utc());
        assert_eq!(series.raw_data.len(), 1);
        assert_eq!(series.raw_data[0].date, date(2));
        assert_eq!(series.raw_data[0].contacts, 4);
        assert_eq!(series.raw_data[0].reconnection_rate, 25.0);
    }

    #[test]
    fn weeks_are_anchored_on_monday() {
        assert_eq!(week_start(date(8)), date(2), "Sunday folds into the preceding Monday");
        assert_eq!(week_start(date(2)), date(2));
        assert_eq!(week_start(date(4)), date(2));
    }

    #[test]
    fn daily_change_compares_last_seven_days_to_previous_seven() {
        // Days 1..=14: one contact per day in the first week, two per day in the second.
        let attempts: Vec<ContactAttempt> = (1..=14)
            .flat_map(|day| {
                let mut v = vec![attempt("A", day)];
                if day > 7 {
                    v.push(attempt("B", day));
                }
                v
            })
            .collect();
        let inputs = TrendInputs {
            attempts: &attempts,
            responses: &[],
            inbound: &[],
            reconnected: &[],
        };
        let series = build_trends(inputs, date(1), date(14), Interval::Daily, utc());
        assert_eq!(series.changes.contacted_change, 100.0);
        assert_eq!(series.changes.sms_responses_change, 0.0);
    }

    #[test]
    fn events_outside_window_are_ignored() {
        let attempts = [attempt("A", 1), attempt("B", 9)];
        let inputs = TrendInputs {
            attempts: &attempts,
            responses: &[],
            inbound: &[],
            reconnected: &[],
        };
        let series = build_trends(inputs, date(2), date(8), Interval::Daily, utc());
        assert_eq!(series.datasets[0].data.iter().sum::<u64>(), 0);
    }

    #[test]
    fn interval_parses_lowercase() {
        assert_eq!("weekly".parse::<Interval>().unwrap(), Interval::Weekly);
        assert!("monthly".parse::<Interval>().is_err());
    }

    /// Distinct contacts and reconnected prospects per day, starting on the 2nd.
    fn fortnight(
        contacts: &[u64],
        reconnects: &[u64],
    ) -> (Vec<ContactAttempt>, Vec<Prospect>) {
        let mut attempts = Vec::new();
        let mut prospects = Vec::new();
        for (offset, (&c, &r)) in contacts.iter().zip(reconnects).enumerate() {
            let day = 2 + offset as u32;
            attempts.extend((0..c).map(|i| attempt(&format!("c{day}-{i}"), day)));
            prospects.extend((0..r).map(|i| reconnected(&format!("r{day}-{i}"), day)));
        }
        (attempts, prospects)
    }

    #[test]
    fn two_weeks_fold_into_two_buckets_with_summed_rates() {
        let contacts = [2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2];
        let reconnects = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0];
        let (attempts, prospects) = fortnight(&contacts, &reconnects);
        let inputs = TrendInputs {
            attempts: &attempts,
            responses: &[],
            inbound: &[],
            reconnected: &prospects,
        };
        let series = build_trends(inputs, date(2), date(15), Interval::Weekly, utc());

        assert_eq!(series.labels, vec!["Mar 2", "Mar 9"]);
        let weeks: Vec<(u64, u64, f64)> = series
            .raw_data
            .iter()
            .map(|w| (w.contacts, w.reconnected, w.reconnection_rate))
            .collect();
        assert_eq!(weeks, vec![(13, 4, 30.8), (14, 3, 21.4)]);
    }

    proptest! {
        #[test]
        fn weekly_rate_matches_summed_counts(
            contacts in proptest::collection::vec(0u64..6, 14),
            reconnects in proptest::collection::vec(0u64..6, 14),
        ) {
            let (attempts, prospects) = fortnight(&contacts, &reconnects);
            let inputs = TrendInputs {
                attempts: &attempts,
                responses: &[],
                inbound: &[],
                reconnected: &prospects,
            };
            let series = build_trends(inputs, date(2), date(15), Interval::Weekly, utc());

            prop_assert_eq!(series.raw_data.len(), 2);
            for (week, point) in series.raw_data.iter().enumerate() {
                let days = week * 7..week * 7 + 7;
                let sum_contacts: u64 = contacts[days.clone()].iter().sum();
                let sum_reconnected: u64 = reconnects[days].iter().sum();
                prop_assert_eq!(point.date, date(2 + 7 * week as u32));
                prop_assert_eq!(point.contacts, sum_contacts);
                prop_assert_eq!(point.reconnected, sum_reconnected);
                prop_assert_eq!(
                    point.reconnection_rate,
                    percentage(sum_reconnected, sum_contacts, CHART_DECIMALS)
                );
            }
        }
    }
}
