// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS thread list and single-thread views.

use chrono::{DateTime, Utc};
use reconnect_core::types::{
    Message, MessageDirection, Prospect, ProspectId, QualificationResult, ThreadSummary,
};
use serde::Serialize;

/// Prospect header shown above a thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadProspect {
    pub id: ProspectId,
    pub name: String,
    pub company: Option<String>,
    pub phone: String,
    pub language: String,
    pub qualification_status: QualificationResult,
}

impl From<&Prospect> for ThreadProspect {
    fn from(p: &Prospect) -> Self {
        Self {
            id: p.id.clone(),
            name: p.display_name(),
            company: p.company.clone(),
            phone: p.phone.clone(),
            language: p.language.clone(),
            qualification_status: p.qualification_status.clone(),
        }
    }
}

/// One row of the thread list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListItem {
    pub id: ProspectId,
    pub prospect: ThreadProspect,
    pub last_message: String,
    pub last_message_time: Option<DateTime<Utc>>,
    pub last_message_direction: MessageDirection,
    pub message_count: u64,
}

impl From<ThreadSummary> for ThreadListItem {
    fn from(summary: ThreadSummary) -> Self {
        Self {
            id: summary.prospect.id.clone(),
            prospect: ThreadProspect::from(&summary.prospect),
            last_message: summary.last_message.unwrap_or_default(),
            last_message_time: summary.last_message_at,
            last_message_direction: summary.last_direction.unwrap_or(MessageDirection::Outbound),
            message_count: summary.message_count,
        }
    }
}

/// A prospect and its full message history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationThread {
    pub prospect: ThreadProspect,
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_item_uses_display_name_and_defaults() {
        let summary = ThreadSummary {
            prospect: Prospect {
                id: "p1".into(),
                firstname: None,
                lastname: None,
                company: Some("Bakkerij Peeters".into()),
                phone: "+3250".into(),
                language: "nl".into(),
                qualification_status: QualificationResult::Confused,
                last_contact_date: None,
                vendor_id: None,
                updated_at: None,
            },
            last_message: None,
            last_message_at: None,
            last_direction: None,
            message_count: 1,
        };
        let item = ThreadListItem::from(summary);
        assert_eq!(item.prospect.name, "Unknown");
        assert_eq!(item.last_message, "");
        assert_eq!(item.last_message_direction, MessageDirection::Outbound);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["prospect"]["qualificationStatus"], "confused");
        assert_eq!(json["lastMessageDirection"], "outbound");
    }
}
