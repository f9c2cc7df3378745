// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vendor rows and the `vendor_performance` view.

use reconnect_core::ReconnectError;
use reconnect_core::types::{Vendor, VendorAggregate};
use rusqlite::params;

use super::count_column;
use crate::database::{Database, map_tr_err};

/// Insert or replace a vendor.
pub async fn upsert_vendor(db: &Database, vendor: &Vendor) -> Result<(), ReconnectError> {
    let v = vendor.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO vendors (id, name, email, phone, active)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![v.id.0, v.name, v.email, v.phone, v.active],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// One aggregate per active vendor, ordered by vendor id.
pub async fn vendor_aggregates(db: &Database) -> Result<Vec<VendorAggregate>, ReconnectError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT vendor_id, vendor_name, vendor_email, total_prospects, total_responses,
                        callbacks, interested_prospects, not_interested_prospects
                 FROM vendor_performance ORDER BY vendor_id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(VendorAggregate {
                    vendor_id: row.get::<_, String>(0)?.into(),
                    vendor_name: row.get(1)?,
                    vendor_email: row.get(2)?,
                    total_prospects: count_column(row, 3)?,
                    total_responses: count_column(row, 4)?,
                    callbacks: count_column(row, 5)?,
                    interested_prospects: count_column(row, 6)?,
                    not_interested_prospects: count_column(row, 7)?,
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
    use crate::queries::prospects::upsert_prospect;
    use crate::queries::responses::insert_response;
    use reconnect_core::types::{Prospect, ProspectResponse, QualificationResult, ResponseType};

    fn vendor(id: &str, active: bool) -> Vendor {
        Vendor {
            id: id.into(),
            name: format!("Vendor {id}"),
            email: format!("{id}@example.com"),
            phone: None,
            active,
        }
    }

    fn assigned(id: &str, vendor: &str, status: QualificationResult) -> Prospect {
        Prospect {
            id: id.into(),
            firstname: None,
            lastname: None,
            company: None,
            phone: format!("+3247{id}"),
            language: "fr".into(),
            qualification_status: status,
            last_contact_date: None,
            vendor_id: Some(vendor.into()),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn view_counts_assigned_prospects_for_active_vendors() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_vendor(&db, &vendor("v1", true)).await.unwrap();
        upsert_vendor(&db, &vendor("v2", true)).await.unwrap();
        upsert_vendor(&db, &vendor("v3", false)).await.unwrap();

        upsert_prospect(&db, &assigned("1", "v1", QualificationResult::Interested)).await.unwrap();
        upsert_prospect(&db, &assigned("2", "v1", QualificationResult::NotInterested)).await.unwrap();
        upsert_prospect(&db, &assigned("3", "v1", QualificationResult::Confused)).await.unwrap();
        for (id, kind) in [("r1", ResponseType::Callback), ("r2", ResponseType::Sms)] {
            insert_response(
                &db,
                &ProspectResponse {
                    id: id.into(),
                    prospect_id: "1".into(),
                    campaign_id: None,
                    response_type: kind,
                    qualification_result: QualificationResult::Interested,
                    received_at: None,
                    requires_followup: false,
                },
            )
            .await
            .unwrap();
        }

        let rows = vendor_aggregates(&db).await.unwrap();
        assert_eq!(rows.len(), 2, "inactive vendors are not aggregated");
        let v1 = &rows[0];
        assert_eq!(v1.vendor_id.as_str(), "v1");
        assert_eq!(v1.total_prospects, 3);
        assert_eq!(v1.total_responses, 1);
        assert_eq!(v1.callbacks, 1);
        assert_eq!(v1.interested_prospects, 1);
        assert_eq!(v1.not_interested_prospects, 1);
        assert_eq!(rows[1].total_prospects, 0);
    }
}
