// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classified prospect response queries.

use reconnect_core::ReconnectError;
use reconnect_core::types::{ProspectResponse, QualificationResult, ResponseType, Scope};
use rusqlite::params;

use super::{Filter, format_timestamp, timestamp_column};
use crate::database::{Database, map_tr_err};

fn response_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProspectResponse> {
    Ok(ProspectResponse {
        id: row.get(0)?,
        prospect_id: row.get::<_, String>(1)?.into(),
        campaign_id: row.get::<_, Option<String>>(2)?.map(Into::into),
        response_type: ResponseType::from_str_value(&row.get::<_, String>(3)?),
        qualification_result: QualificationResult::from_str_value(&row.get::<_, String>(4)?),
        received_at: timestamp_column(row, 5)?,
        requires_followup: row.get(6)?,
    })
}

/// Insert a classified response.
pub async fn insert_response(
    db: &Database,
    response: &ProspectResponse,
) -> Result<(), ReconnectError> {
    let response = response.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO prospect_responses (id, prospect_id, campaign_id, response_type,
                     qualification_result, received_at, requires_followup)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    response.id,
                    response.prospect_id.0,
                    response.campaign_id.map(|c| c.0),
                    response.response_type.as_str(),
                    response.qualification_result.as_str(),
                    response.received_at.as_ref().map(format_timestamp),
                    response.requires_followup,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Responses in scope, ordered by `received_at` then id.
pub async fn list_responses(
    db: &Database,
    scope: &Scope,
) -> Result<Vec<ProspectResponse>, ReconnectError> {
    let filter = Filter::scoped(scope, "campaign_id", "received_at");
    let sql = format!(
        "SELECT id, prospect_id, campaign_id, response_type, qualification_result,
                received_at, requires_followup
         FROM prospect_responses{} ORDER BY received_at, id",
        filter.where_sql()
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(filter.params(), response_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
