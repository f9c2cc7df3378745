// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vendor notification queries.

use reconnect_core::ReconnectError;
use reconnect_core::types::{Scope, VendorNotification};
use rusqlite::params;

use super::{Filter, format_timestamp, timestamp_column};
use crate::database::{Database, map_tr_err};

/// Insert a vendor notification.
pub async fn insert_notification(
    db: &Database,
    notification: &VendorNotification,
) -> Result<(), ReconnectError> {
    let n = notification.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO vendor_notifications (id, prospect_id, vendor_id, campaign_id, sent_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    n.id,
                    n.prospect_id.0,
                    n.vendor_id.0,
                    n.campaign_id.map(|c| c.0),
                    n.sent_at.as_ref().map(format_timestamp),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Notifications in scope, ordered by `sent_at` then id.
pub async fn list_notifications(
    db: &Database,
    scope: &Scope,
) -> Result<Vec<VendorNotification>, ReconnectError> {
    let filter = Filter::scoped(scope, "campaign_id", "sent_at");
    let sql = format!(
        "SELECT id, prospect_id, vendor_id, campaign_id, sent_at
         FROM vendor_notifications{} ORDER BY sent_at, id",
        filter.where_sql()
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(filter.params(), |row| {
                Ok(VendorNotification {
                    id: row.get(0)?,
                    prospect_id: row.get::<_, String>(1)?.into(),
                    vendor_id: row.get::<_, String>(2)?.into(),
                    campaign_id: row.get::<_, Option<String>>(3)?.map(Into::into),
                    sent_at: timestamp_column(row, 4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use reconnect_core::types::DateRange;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
    }

    fn notification(id: &str, campaign: Option<&str>, sent: Option<u32>) -> VendorNotification {
        VendorNotification {
            id: id.to_string(),
            prospect_id: format!("p-{id}").into(),
            vendor_id: "v1".into(),
            campaign_id: campaign.map(Into::into),
            sent_at: sent.map(at),
        }
    }

    #[tokio::test]
    async fn lists_in_sent_order_within_scope() {
        let db = Database::open_in_memory().await.unwrap();
        let late = notification("n1", Some("c1"), Some(6));
        let early = notification("n2", Some("c1"), Some(3));
        let other = notification("n3", Some("c2"), Some(4));
        let undated = notification("n4", Some("c1"), None);
        for n in [&late, &early, &other, &undated] {
            insert_notification(&db, n).await.unwrap();
        }

        let campaign = Scope::new(Some("c1".into()), None);
        let rows = list_notifications(&db, &campaign).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n4", "n2", "n1"], "undated first, then by sent_at");
        assert_eq!(rows[1], early);
        assert_eq!(rows[2], late);

        let range = DateRange {
            start: at(2),
            end: at(5),
        };
        let ranged = list_notifications(&db, &Scope::new(None, Some(range))).await.unwrap();
        let ids: Vec<&str> = ranged.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n3"], "undated rows fall outside any range");
    }
}
