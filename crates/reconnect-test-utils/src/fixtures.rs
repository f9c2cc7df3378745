// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record builders with sensible defaults.

use chrono::{DateTime, TimeZone, Utc};

use reconnect_core::types::{
    AttemptType, Campaign, ContactAttempt, Message, MessageDirection, Prospect, ProspectResponse,
    QualificationResult, ResponseType, Vendor, VendorNotification,
};

/// A UTC instant. Panics on an impossible date, which is a test bug.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day} {hour}:{minute}"))
}

pub fn attempt(id: &str, prospect: &str, sent_at: DateTime<Utc>) -> ContactAttempt {
    ContactAttempt {
        id: id.to_string(),
        prospect_id: prospect.into(),
        campaign_id: None,
        attempt_type: AttemptType::Sms,
        status: "sent".to_string(),
        sent_at: Some(sent_at),
        cost_amount: Some(0.08),
    }
}

fn message(id: &str, prospect: &str, direction: MessageDirection, sent_at: DateTime<Utc>) -> Message {
    Message {
        id: id.to_string(),
        prospect_id: prospect.into(),
        campaign_id: None,
        direction,
        content: format!("message {id}"),
        sent_at: Some(sent_at),
        delivery_status: Some("delivered".to_string()),
        delivered_at: None,
        read_at: None,
    }
}

pub fn inbound(id: &str, prospect: &str, sent_at: DateTime<Utc>) -> Message {
    message(id, prospect, MessageDirection::Inbound, sent_at)
}

pub fn outbound(id: &str, prospect: &str, sent_at: DateTime<Utc>) -> Message {
    message(id, prospect, MessageDirection::Outbound, sent_at)
}

pub fn response(
    id: &str,
    prospect: &str,
    result: QualificationResult,
    received_at: DateTime<Utc>,
) -> ProspectResponse {
    ProspectResponse {
        id: id.to_string(),
        prospect_id: prospect.into(),
        campaign_id: None,
        response_type: ResponseType::Sms,
        qualification_result: result,
        received_at: Some(received_at),
        requires_followup: false,
    }
}

pub fn notification(
    id: &str,
    prospect: &str,
    vendor: &str,
    sent_at: DateTime<Utc>,
) -> VendorNotification {
    VendorNotification {
        id: id.to_string(),
        prospect_id: prospect.into(),
        vendor_id: vendor.into(),
        campaign_id: None,
        sent_at: Some(sent_at),
    }
}

pub fn prospect(id: &str, status: QualificationResult) -> Prospect {
    Prospect {
        id: id.into(),
        firstname: None,
        lastname: None,
        company: None,
        phone: format!("+32470{id}"),
        language: "nl".to_string(),
        qualification_status: status,
        last_contact_date: None,
        vendor_id: None,
        updated_at: None,
    }
}

pub fn vendor(id: &str, name: &str) -> Vendor {
    Vendor {
        id: id.into(),
        name: name.to_string(),
        email: format!("{id}@vendors.test"),
        phone: None,
        active: true,
    }
}

pub fn campaign(id: &str, name: &str) -> Campaign {
    Campaign {
        id: id.into(),
        name: name.to_string(),
        status: "in_progress".to_string(),
        started_at: None,
        completed_at: None,
        filters: None,
    }
}

/// Records to load into a store before a test runs.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub attempts: Vec<ContactAttempt>,
    pub messages: Vec<Message>,
    pub responses: Vec<ProspectResponse>,
    pub notifications: Vec<VendorNotification>,
    pub prospects: Vec<Prospect>,
    pub vendors: Vec<Vendor>,
    pub campaigns: Vec<Campaign>,
}

impl Seed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt(mut self, attempt: ContactAttempt) -> Self {
        self.attempts.push(attempt);
        self
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn response(mut self, response: ProspectResponse) -> Self {
        self.responses.push(response);
        self
    }

    pub fn notification(mut self, notification: VendorNotification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn prospect(mut self, prospect: Prospect) -> Self {
        self.prospects.push(prospect);
        self
    }

    pub fn vendor(mut self, vendor: Vendor) -> Self {
        self.vendors.push(vendor);
        self
    }

    pub fn campaign(mut self, campaign: Campaign) -> Self {
        self.campaigns.push(campaign);
        self
    }

    /// The funnel scenario: A contacted once, B contacted twice, B replies
    /// inbound, is classified interested, and is handed to vendor V1.
    pub fn funnel_scenario() -> Self {
        let monday = at(2026, 3, 2, 10, 0);
        Self::new()
            .attempt(attempt("a1", "A", monday))
            .attempt(attempt("a2", "B", monday))
            .attempt(attempt("a3", "B", at(2026, 3, 3, 10, 0)))
            .message(inbound("m1", "B", at(2026, 3, 3, 11, 0)))
            .response(response(
                "r1",
                "B",
                QualificationResult::Interested,
                at(2026, 3, 3, 11, 5),
            ))
            .notification(notification("n1", "B", "V1", at(2026, 3, 3, 12, 0)))
    }

    /// The heatmap scenario: A and B contacted Monday 10:xx, only B responds.
    pub fn heatmap_scenario() -> Self {
        Self::new()
            .attempt(attempt("a1", "A", at(2026, 3, 2, 10, 5)))
            .attempt(attempt("a2", "B", at(2026, 3, 2, 10, 40)))
            .response(response(
                "r1",
                "B",
                QualificationResult::NotInterested,
                at(2026, 3, 2, 15, 0),
            ))
    }
}
