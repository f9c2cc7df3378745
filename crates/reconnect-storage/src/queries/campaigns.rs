// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign records.

use reconnect_core::ReconnectError;
use reconnect_core::types::{Campaign, CampaignId};
use rusqlite::params;
use rusqlite::types::Type;

use super::{format_timestamp, timestamp_column};
use crate::database::{Database, map_tr_err};

/// Insert or replace a campaign. `filters` is stored as JSON text.
pub async fn upsert_campaign(db: &Database, campaign: &Campaign) -> Result<(), ReconnectError> {
    let c = campaign.clone();
    let filters = c
        .filters
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ReconnectError::Storage {
            source: Box::new(e),
        })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO campaigns (id, campaign_name, status, started_at, completed_at, filters_applied)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    c.id.0,
                    c.name,
                    c.status,
                    c.started_at.as_ref().map(format_timestamp),
                    c.completed_at.as_ref().map(format_timestamp),
                    filters,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Look up one campaign.
pub async fn get_campaign(
    db: &Database,
    id: &CampaignId,
) -> Result<Option<Campaign>, ReconnectError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, campaign_name, status, started_at, completed_at, filters_applied
                 FROM campaigns WHERE id = ?1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                let filters = row
                    .get::<_, Option<String>>(5)?
                    .map(|raw| {
                        serde_json::from_str(&raw).map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
                        })
                    })
                    .transpose()?;
                Ok(Campaign {
                    id: row.get::<_, String>(0)?.into(),
                    name: row.get(1)?,
                    status: row.get(2)?,
                    started_at: timestamp_column(row, 3)?,
                    completed_at: timestamp_column(row, 4)?,
                    filters,
                })
            })?;
            let first = rows.next().transpose()?;
            Ok(first)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn campaign_filters_survive_as_json() {
        let db = Database::open_in_memory().await.unwrap();
        let campaign = Campaign {
            id: "c1".into(),
            name: "Spring reactivation".into(),
            status: "running".into(),
            started_at: Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()),
            completed_at: None,
            filters: Some(serde_json::json!({"language": "nl", "minAgeDays": 90})),
        };
        upsert_campaign(&db, &campaign).await.unwrap();

        assert_eq!(get_campaign(&db, &"c1".into()).await.unwrap(), Some(campaign));
        assert_eq!(get_campaign(&db, &"missing".into()).await.unwrap(), None);
    }
}
