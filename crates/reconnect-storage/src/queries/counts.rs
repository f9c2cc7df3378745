// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Distinct-prospect counts behind each funnel stage.

use reconnect_core::ReconnectError;
use reconnect_core::types::{ProspectCountQuery, Scope};

use super::{Filter, count_column};
use crate::database::{Database, map_tr_err};

/// Table, timestamp column, and extra predicate for one stage.
fn stage_source(query: ProspectCountQuery) -> (&'static str, &'static str, Option<&'static str>) {
    match query {
        ProspectCountQuery::Contacted => ("contact_attempts", "sent_at", None),
        ProspectCountQuery::Responded => ("prospect_responses", "received_at", None),
        ProspectCountQuery::Engaged => (
            "sms_conversations",
            "sent_at",
            Some("message_direction = 'inbound'"),
        ),
        ProspectCountQuery::Qualified => (
            "prospect_responses",
            "received_at",
            Some("qualification_result = 'interested'"),
        ),
        ProspectCountQuery::Notified => ("vendor_notifications", "sent_at", None),
    }
}

/// Count distinct `prospect_id`s matching `query` in `scope`.
pub async fn count_distinct_prospects(
    db: &Database,
    query: ProspectCountQuery,
    scope: &Scope,
) -> Result<u64, ReconnectError> {
    let (table, time_column, predicate) = stage_source(query);
    let mut filter = Filter::scoped(scope, "campaign_id", time_column);
    if let Some(predicate) = predicate {
        filter.push(predicate);
    }
    let sql = format!(
        "SELECT COUNT(DISTINCT prospect_id) FROM {table}{}",
        filter.where_sql()
    );
    db.connection()
        .call(move |conn| conn.query_row(&sql, filter.params(), |row| count_column(row, 0)))
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::attempts::insert_attempt;
    use crate::queries::messages::insert_message;
    use crate::queries::responses::insert_response;
    use chrono::{TimeZone, Utc};
    use reconnect_core::types::{
        AttemptType, ContactAttempt, Message, MessageDirection, ProspectResponse,
        QualificationResult, ResponseType,
    };

    fn attempt(id: &str, prospect: &str) -> ContactAttempt {
        ContactAttempt {
            id: id.into(),
            prospect_id: prospect.into(),
            campaign_id: Some("c1".into()),
            attempt_type: AttemptType::Sms,
            status: "sent".into(),
            sent_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()),
            cost_amount: None,
        }
    }

    #[tokio::test]
    async fn counts_each_prospect_once_per_stage() {
        let db = Database::open_in_memory().await.unwrap();
        insert_attempt(&db, &attempt("a1", "A")).await.unwrap();
        insert_attempt(&db, &attempt("a2", "B")).await.unwrap();
        insert_attempt(&db, &attempt("a3", "B")).await.unwrap();
        insert_message(
            &db,
            &Message {
                id: "m1".into(),
                prospect_id: "A".into(),
                campaign_id: Some("c1".into()),
                direction: MessageDirection::Inbound,
                content: "ja".into(),
                sent_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 11, 0, 0).unwrap()),
                delivery_status: None,
                delivered_at: None,
                read_at: None,
            },
        )
        .await
        .unwrap();
        insert_response(
            &db,
            &ProspectResponse {
                id: "r1".into(),
                prospect_id: "A".into(),
                campaign_id: Some("c1".into()),
                response_type: ResponseType::Sms,
                qualification_result: QualificationResult::NotInterested,
                received_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 11, 1, 0).unwrap()),
                requires_followup: false,
            },
        )
        .await
        .unwrap();

        let scope = Scope::new(Some("c1".into()), None);
        let count = |q| count_distinct_prospects(&db, q, &scope);
        assert_eq!(count(ProspectCountQuery::Contacted).await.unwrap(), 2);
        assert_eq!(count(ProspectCountQuery::Responded).await.unwrap(), 1);
        assert_eq!(count(ProspectCountQuery::Engaged).await.unwrap(), 1);
        assert_eq!(count(ProspectCountQuery::Qualified).await.unwrap(), 0);
        assert_eq!(count(ProspectCountQuery::Notified).await.unwrap(), 0);
    }
}
