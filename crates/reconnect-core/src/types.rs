// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed records for the outreach event store and the scope every
//! aggregation is computed over.
//!
//! Store-native rows are converted into these records exactly once, at the
//! storage boundary. Aggregators never see loosely-typed rows.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Unique identifier for a prospect (contact target).
    ProspectId
);
id_newtype!(
    /// Unique identifier for an outreach campaign.
    CampaignId
);
id_newtype!(
    /// Unique identifier for a vendor receiving qualified leads.
    VendorId
);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Observability,
}

/// Names each aggregator for logs, metrics labels, and error reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AggregatorKind {
    Funnel,
    Heatmap,
    Trends,
    Vendors,
    Overview,
    Conversations,
}

/// Kind of outbound contact action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttemptType {
    Call,
    Sms,
    MissedCall,
}

/// Direction of an SMS message relative to the operator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

/// Classification of a prospect reply, also used as the prospect's
/// current qualification status.
///
/// Values written by the external qualification workflow that this service
/// does not know are kept verbatim in [`QualificationResult::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QualificationResult {
    Interested,
    NotInterested,
    Confused,
    Ambiguous,
    NoResponse,
    Other(String),
}

impl QualificationResult {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &str {
        match self {
            QualificationResult::Interested => "interested",
            QualificationResult::NotInterested => "not_interested",
            QualificationResult::Confused => "confused",
            QualificationResult::Ambiguous => "ambiguous",
            QualificationResult::NoResponse => "no_response",
            QualificationResult::Other(raw) => raw,
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "interested" => QualificationResult::Interested,
            "not_interested" => QualificationResult::NotInterested,
            "confused" => QualificationResult::Confused,
            "ambiguous" => QualificationResult::Ambiguous,
            "no_response" => QualificationResult::NoResponse,
            other => QualificationResult::Other(other.to_string()),
        }
    }

    /// A definite outcome after contact: interested or not interested.
    pub fn is_reconnected(&self) -> bool {
        matches!(
            self,
            QualificationResult::Interested | QualificationResult::NotInterested
        )
    }
}

impl Serialize for QualificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Channel through which a classified response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResponseType {
    Sms,
    Callback,
    Other(String),
}

impl ResponseType {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &str {
        match self {
            ResponseType::Sms => "sms",
            ResponseType::Callback => "callback",
            ResponseType::Other(raw) => raw,
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "sms" => ResponseType::Sms,
            "callback" => ResponseType::Callback,
            other => ResponseType::Other(other.to_string()),
        }
    }
}

impl Serialize for ResponseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One outbound contact action. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAttempt {
    pub id: String,
    pub prospect_id: ProspectId,
    pub campaign_id: Option<CampaignId>,
    pub attempt_type: AttemptType,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub cost_amount: Option<f64>,
}

/// One SMS message in a prospect thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub prospect_id: ProspectId,
    pub campaign_id: Option<CampaignId>,
    pub direction: MessageDirection,
    pub content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivery_status: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

/// A classified reply produced by the external qualification workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProspectResponse {
    pub id: String,
    pub prospect_id: ProspectId,
    pub campaign_id: Option<CampaignId>,
    pub response_type: ResponseType,
    pub qualification_result: QualificationResult,
    pub received_at: Option<DateTime<Utc>>,
    pub requires_followup: bool,
}

/// A qualified lead handed to a vendor. Terminal funnel stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorNotification {
    pub id: String,
    pub prospect_id: ProspectId,
    pub vendor_id: VendorId,
    pub campaign_id: Option<CampaignId>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// A contact target with its externally driven qualification status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub id: ProspectId,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub company: Option<String>,
    pub phone: String,
    pub language: String,
    pub qualification_status: QualificationResult,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub vendor_id: Option<VendorId>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Prospect {
    /// "First Last", or "Unknown" when neither name part is present.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            "Unknown".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// An outreach campaign. Scope boundary when a campaign id is supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub filters: Option<serde_json::Value>,
}

/// A vendor that receives qualified leads. Only active vendors are aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
}

/// Per-vendor counts from the `vendor_performance` view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAggregate {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub vendor_email: String,
    pub total_prospects: u64,
    pub total_responses: u64,
    pub callbacks: u64,
    pub interested_prospects: u64,
    pub not_interested_prospects: u64,
}

/// Latest-message summary of one prospect's SMS thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadSummary {
    pub prospect: Prospect,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_direction: Option<MessageDirection>,
    pub message_count: u64,
}

/// Filter for listing SMS threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadFilter {
    /// Only prospects with this qualification status.
    pub status: Option<QualificationResult>,
    /// Case-insensitive substring over first name, last name, company, phone.
    pub search: Option<String>,
}

/// Inclusive UTC time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at <= self.end
    }
}

/// The filter scope shared by every aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub campaign_id: Option<CampaignId>,
    pub range: Option<DateRange>,
}

impl Scope {
    pub fn new(campaign_id: Option<CampaignId>, range: Option<DateRange>) -> Self {
        Self { campaign_id, range }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.campaign_id {
            Some(id) => write!(f, "campaign={id}")?,
            None => f.write_str("campaign=all")?,
        }
        match &self.range {
            Some(range) => write!(
                f,
                " range={}..{}",
                range.start.to_rfc3339(),
                range.end.to_rfc3339()
            ),
            None => f.write_str(" range=all"),
        }
    }
}

/// Distinct-prospect count predicates, one per funnel stage.
///
/// Each predicate counts over its own table. Stages are not joined, so a
/// later stage may count prospects that never appear in an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProspectCountQuery {
    /// Any contact attempt.
    Contacted,
    /// Any classified response.
    Responded,
    /// Any inbound message.
    Engaged,
    /// A response classified as interested.
    Qualified,
    /// Any vendor notification.
    Notified,
}

impl ProspectCountQuery {
    /// Funnel order.
    pub const ALL: [ProspectCountQuery; 5] = [
        ProspectCountQuery::Contacted,
        ProspectCountQuery::Responded,
        ProspectCountQuery::Engaged,
        ProspectCountQuery::Qualified,
        ProspectCountQuery::Notified,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn qualification_result_round_trips_known_and_unknown() {
        for raw in ["interested", "not_interested", "confused", "ambiguous", "no_response"] {
            assert_eq!(QualificationResult::from_str_value(raw).as_str(), raw);
        }
        let other = QualificationResult::from_str_value("pending");
        assert_eq!(other, QualificationResult::Other("pending".into()));
        assert_eq!(other.as_str(), "pending");
    }

    #[test]
    fn only_definite_outcomes_count_as_reconnected() {
        assert!(QualificationResult::Interested.is_reconnected());
        assert!(QualificationResult::NotInterested.is_reconnected());
        assert!(!QualificationResult::Confused.is_reconnected());
        assert!(!QualificationResult::Other("pending".into()).is_reconnected());
    }

    #[test]
    fn attempt_type_uses_snake_case() {
        assert_eq!(AttemptType::MissedCall.to_string(), "missed_call");
        assert_eq!(AttemptType::from_str("sms").unwrap(), AttemptType::Sms);
        assert!(AttemptType::from_str("fax").is_err());
    }

    #[test]
    fn display_name_falls_back_to_unknown() {
        let mut prospect = Prospect {
            id: "p1".into(),
            firstname: Some("Anna".into()),
            lastname: Some("Peeters".into()),
            company: None,
            phone: "+3212345678".into(),
            language: "nl".into(),
            qualification_status: QualificationResult::Other("pending".into()),
            last_contact_date: None,
            vendor_id: None,
            updated_at: None,
        };
        assert_eq!(prospect.display_name(), "Anna Peeters");
        prospect.lastname = None;
        assert_eq!(prospect.display_name(), "Anna");
        prospect.firstname = Some("  ".into());
        assert_eq!(prospect.display_name(), "Unknown");
    }

    #[test]
    fn scope_display_names_campaign_and_range() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 8, 23, 59, 59).unwrap();
        let scope = Scope::new(Some("c-1".into()), Some(DateRange { start, end }));
        let rendered = scope.to_string();
        assert!(rendered.starts_with("campaign=c-1 range=2026-03-02T00:00:00"));
        assert_eq!(Scope::default().to_string(), "campaign=all range=all");
    }

    #[test]
    fn qualification_serializes_as_plain_string() {
        let json = serde_json::to_string(&QualificationResult::NotInterested).unwrap();
        assert_eq!(json, "\"not_interested\"");
    }
}
