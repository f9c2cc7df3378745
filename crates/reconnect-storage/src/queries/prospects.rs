// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prospect lookups, the reconnected set, and SMS thread summaries.

use reconnect_core::ReconnectError;
use reconnect_core::types::{
    MessageDirection, Prospect, ProspectId, QualificationResult, Scope, ThreadFilter,
    ThreadSummary,
};
use rusqlite::params;

use super::{Filter, count_column, format_timestamp, timestamp_column};
use crate::database::{Database, map_tr_err};

const PROSPECT_COLUMNS: &str = "p.id, p.firstname, p.lastname, p.company, p.phone, p.language, \
                                p.qualification_status, p.last_contact_date, \
                                p.assigned_vendor_id, p.updated_at";

/// Number of columns in [`PROSPECT_COLUMNS`].
const PROSPECT_WIDTH: usize = 10;

fn prospect_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Prospect> {
    Ok(Prospect {
        id: row.get::<_, String>(0)?.into(),
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        company: row.get(3)?,
        phone: row.get(4)?,
        language: row.get(5)?,
        qualification_status: QualificationResult::from_str_value(&row.get::<_, String>(6)?),
        last_contact_date: timestamp_column(row, 7)?,
        vendor_id: row.get::<_, Option<String>>(8)?.map(Into::into),
        updated_at: timestamp_column(row, 9)?,
    })
}

/// Case-insensitive substring match over name, company and phone.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so accented names are
/// matched here instead of in SQL.
fn matches_search(prospect: &Prospect, needle: &str) -> bool {
    [
        prospect.firstname.as_deref(),
        prospect.lastname.as_deref(),
        prospect.company.as_deref(),
    ]
    .into_iter()
    .flatten()
    .chain(std::iter::once(prospect.phone.as_str()))
    .any(|field| field.to_lowercase().contains(needle))
}

/// Insert or replace a prospect.
pub async fn upsert_prospect(db: &Database, prospect: &Prospect) -> Result<(), ReconnectError> {
    let p = prospect.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO prospects (id, firstname, lastname, company, phone, language,
                     qualification_status, last_contact_date, assigned_vendor_id, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    p.id.0,
                    p.firstname,
                    p.lastname,
                    p.company,
                    p.phone,
                    p.language,
                    p.qualification_status.as_str(),
                    p.last_contact_date.as_ref().map(format_timestamp),
                    p.vendor_id.map(|v| v.0),
                    p.updated_at.as_ref().map(format_timestamp),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Look up one prospect.
pub async fn get_prospect(
    db: &Database,
    id: &ProspectId,
) -> Result<Option<Prospect>, ReconnectError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {PROSPECT_COLUMNS} FROM prospects p WHERE p.id = ?1"))?;
            let mut rows = stmt.query_map(params![id], prospect_from_row)?;
            let first = rows.next().transpose()?;
            Ok(first)
        })
        .await
        .map_err(map_tr_err)
}

/// Prospects with a definite outcome (interested or not interested).
///
/// A campaign scope keeps prospects with at least one attempt in that
/// campaign. A range applies to `updated_at`, the closest record of when the
/// status was set.
pub async fn reconnected_prospects(
    db: &Database,
    scope: &Scope,
) -> Result<Vec<Prospect>, ReconnectError> {
    let mut filter = Filter::default();
    filter.push("p.qualification_status IN ('interested', 'not_interested')");
    if let Some(campaign_id) = &scope.campaign_id {
        filter.bind(
            "p.id IN (SELECT a.prospect_id FROM contact_attempts a WHERE a.campaign_id = ?)",
            campaign_id.0.clone(),
        );
    }
    if let Some(range) = &scope.range {
        filter.bind("p.updated_at >= ?", format_timestamp(&range.start));
        filter.bind("p.updated_at <= ?", format_timestamp(&range.end));
    }
    let sql = format!(
        "SELECT {PROSPECT_COLUMNS} FROM prospects p{} ORDER BY p.id",
        filter.where_sql()
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(filter.params(), prospect_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// One summary per prospect with at least one message, most recent thread first.
///
/// Threads whose messages are all undated sort last, then by prospect id.
pub async fn thread_summaries(
    db: &Database,
    filter: &ThreadFilter,
) -> Result<Vec<ThreadSummary>, ReconnectError> {
    const LATEST: &str = "FROM sms_conversations m WHERE m.prospect_id = p.id \
                          ORDER BY m.sent_at DESC, m.id DESC LIMIT 1";

    let mut where_filter = Filter::default();
    where_filter.push("EXISTS (SELECT 1 FROM sms_conversations m WHERE m.prospect_id = p.id)");
    if let Some(status) = &filter.status {
        where_filter.bind("p.qualification_status = ?", status.as_str().to_string());
    }
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let sql = format!(
        "SELECT {PROSPECT_COLUMNS},
                (SELECT m.message_content {LATEST}) AS last_message,
                (SELECT m.sent_at {LATEST}) AS last_message_at,
                (SELECT m.message_direction {LATEST}) AS last_direction,
                (SELECT COUNT(*) FROM sms_conversations m WHERE m.prospect_id = p.id) AS message_count
         FROM prospects p{}
         ORDER BY last_message_at DESC, p.id",
        where_filter.where_sql()
    );

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(where_filter.params(), |row| {
                let last_direction = row
                    .get::<_, Option<String>>(PROSPECT_WIDTH + 2)?
                    .map(|raw| {
                        raw.parse::<MessageDirection>().map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                PROSPECT_WIDTH + 2,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })
                    })
                    .transpose()?;
                Ok(ThreadSummary {
                    prospect: prospect_from_row(row)?,
                    last_message: row.get(PROSPECT_WIDTH)?,
                    last_message_at: timestamp_column(row, PROSPECT_WIDTH + 1)?,
                    last_direction,
                    message_count: count_column(row, PROSPECT_WIDTH + 3)?,
                })
            })?;
            let mut summaries = Vec::new();
            for summary in rows {
                let summary = summary?;
                if needle
                    .as_deref()
                    .is_none_or(|needle| matches_search(&summary.prospect, needle))
                {
                    summaries.push(summary);
                }
            }
            Ok(summaries)
        })
        .await
        .map_err(map_tr_err)
}
