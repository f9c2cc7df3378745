// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact attempt queries.

use reconnect_core::ReconnectError;
use reconnect_core::types::{ContactAttempt, Scope};
use rusqlite::params;

use super::{Filter, enum_column, format_timestamp, timestamp_column};
use crate::database::{Database, map_tr_err};

fn attempt_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ContactAttempt> {
    Ok(ContactAttempt {
        id: row.get(0)?,
        prospect_id: row.get::<_, String>(1)?.into(),
        campaign_id: row.get::<_, Option<String>>(2)?.map(Into::into),
        attempt_type: enum_column(row, 3)?,
        status: row.get(4)?,
        sent_at: timestamp_column(row, 5)?,
        cost_amount: row.get(6)?,
    })
}

/// Insert a contact attempt.
pub async fn insert_attempt(db: &Database, attempt: &ContactAttempt) -> Result<(), ReconnectError> {
    let attempt = attempt.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO contact_attempts (id, prospect_id, campaign_id, attempt_type, status, sent_at, cost_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    attempt.id,
                    attempt.prospect_id.0,
                    attempt.campaign_id.map(|c| c.0),
                    attempt.attempt_type.to_string(),
                    attempt.status,
                    attempt.sent_at.as_ref().map(format_timestamp),
                    attempt.cost_amount,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Contact attempts in scope, ordered by `sent_at` (nulls first) then id.
pub async fn list_attempts(db: &Database, scope: &Scope) -> Result<Vec<ContactAttempt>, ReconnectError> {
    let filter = Filter::scoped(scope, "campaign_id", "sent_at");
    let sql = format!(
        "SELECT id, prospect_id, campaign_id, attempt_type, status, sent_at, cost_amount
         FROM contact_attempts{} ORDER BY sent_at, id",
        filter.where_sql()
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(filter.params(), attempt_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
