// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS message queries over `sms_conversations`.

use reconnect_core::ReconnectError;
use reconnect_core::types::{Message, MessageDirection, ProspectId, Scope};
use rusqlite::params;

use super::{Filter, enum_column, format_timestamp, timestamp_column};
use crate::database::{Database, map_tr_err};

const MESSAGE_COLUMNS: &str = "id, prospect_id, campaign_id, message_direction, message_content, \
                               sent_at, twilio_status, delivered_at, read_at";

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        prospect_id: row.get::<_, String>(1)?.into(),
        campaign_id: row.get::<_, Option<String>>(2)?.map(Into::into),
        direction: enum_column(row, 3)?,
        content: row.get(4)?,
        sent_at: timestamp_column(row, 5)?,
        delivery_status: row.get(6)?,
        delivered_at: timestamp_column(row, 7)?,
        read_at: timestamp_column(row, 8)?,
    })
}

fn direction_filter(scope: &Scope, direction: Option<MessageDirection>) -> Filter {
    let mut filter = Filter::scoped(scope, "campaign_id", "sent_at");
    if let Some(direction) = direction {
        filter.bind("message_direction = ?", direction.to_string());
    }
    filter
}

/// Insert a message.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), ReconnectError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sms_conversations (id, prospect_id, campaign_id, message_direction,
                     message_content, sent_at, twilio_status, delivered_at, read_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    msg.id,
                    msg.prospect_id.0,
                    msg.campaign_id.map(|c| c.0),
                    msg.direction.to_string(),
                    msg.content,
                    msg.sent_at.as_ref().map(format_timestamp),
                    msg.delivery_status,
                    msg.delivered_at.as_ref().map(format_timestamp),
                    msg.read_at.as_ref().map(format_timestamp),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Messages in scope, optionally of one direction, in chronological order.
pub async fn list_messages(
    db: &Database,
    scope: &Scope,
    direction: Option<MessageDirection>,
) -> Result<Vec<Message>, ReconnectError> {
    let filter = direction_filter(scope, direction);
    let sql = format!(
        "SELECT {MESSAGE_COLUMNS} FROM sms_conversations{} ORDER BY sent_at, id",
        filter.where_sql()
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(filter.params(), message_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// One prospect's thread, oldest first, undated messages last.
pub async fn messages_for_prospect(
    db: &Database,
    prospect_id: &ProspectId,
) -> Result<Vec<Message>, ReconnectError> {
    let prospect_id = prospect_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM sms_conversations
                 WHERE prospect_id = ?1
                 ORDER BY sent_at IS NULL, sent_at, id"
            ))?;
            let rows = stmt.query_map(params![prospect_id], message_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_msg(id: &str, prospect: &str, direction: MessageDirection, minute: Option<u32>) -> Message {
        Message {
            id: id.to_string(),
            prospect_id: prospect.into(),
            campaign_id: Some("c1".into()),
            direction,
            content: format!("body {id}"),
            sent_at: minute.map(|m| Utc.with_ymd_and_hms(2026, 3, 2, 10, m, 0).unwrap()),
            delivery_status: Some("delivered".to_string()),
            delivered_at: None,
            read_at: None,
        }
    }

    #[tokio::test]
    async fn lists_by_direction() {
        let db = Database::open_in_memory().await.unwrap();
        insert_message(&db, &make_msg("m1", "p1", MessageDirection::Outbound, Some(0))).await.unwrap();
        insert_message(&db, &make_msg("m2", "p1", MessageDirection::Inbound, Some(5))).await.unwrap();
        insert_message(&db, &make_msg("m3", "p1", MessageDirection::Inbound, Some(6))).await.unwrap();

        let scope = Scope::default();
        assert_eq!(list_messages(&db, &scope, None).await.unwrap().len(), 3);
        let inbound = list_messages(&db, &scope, Some(MessageDirection::Inbound))
            .await
            .unwrap();
        assert_eq!(inbound.len(), 2);
        assert!(inbound.iter().all(|m| m.direction == MessageDirection::Inbound));
    }

    #[tokio::test]
    async fn thread_is_chronological_with_undated_last() {
        let db = Database::open_in_memory().await.unwrap();
        insert_message(&db, &make_msg("m-late", "p1", MessageDirection::Inbound, Some(30))).await.unwrap();
        insert_message(&db, &make_msg("m-undated", "p1", MessageDirection::Outbound, None)).await.unwrap();
        insert_message(&db, &make_msg("m-early", "p1", MessageDirection::Outbound, Some(1))).await.unwrap();
        insert_message(&db, &make_msg("other", "p2", MessageDirection::Inbound, Some(2))).await.unwrap();

        let thread = messages_for_prospect(&db, &"p1".into()).await.unwrap();
        let ids: Vec<&str> = thread.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m-early", "m-late", "m-undated"]);
    }
}
