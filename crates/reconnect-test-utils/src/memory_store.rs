// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `EventStore` for deterministic aggregator tests.
//!
//! Applies the same scope rules as the SQLite store: campaign equality and an
//! inclusive range on each table's own timestamp, with null timestamps never
//! matching a ranged scope.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use reconnect_core::types::{
    AdapterType, Campaign, CampaignId, ContactAttempt, HealthStatus, Message, MessageDirection,
    Prospect, ProspectCountQuery, ProspectId, ProspectResponse, QualificationResult, Scope,
    ThreadFilter, ThreadSummary, VendorAggregate, VendorNotification,
};
use reconnect_core::{EventStore, PluginAdapter, ReconnectError};

use crate::fixtures::Seed;

fn in_scope(scope: &Scope, campaign: Option<&CampaignId>, at: Option<&DateTime<Utc>>) -> bool {
    if let Some(wanted) = &scope.campaign_id
        && campaign != Some(wanted)
    {
        return false;
    }
    match (&scope.range, at) {
        (None, _) => true,
        (Some(range), Some(at)) => range.contains(at),
        (Some(_), None) => false,
    }
}

/// Event store over a [`Seed`], with optional injected failure and latency.
pub struct MemoryEventStore {
    seed: Seed,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicU64,
}

impl MemoryEventStore {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    /// Make every subsequent read fail with a storage error carrying `message`.
    pub async fn fail_with(&self, message: &str) {
        *self.failure.lock().await = Some(message.to_string());
    }

    /// Make every subsequent read sleep for `delay` before answering.
    pub async fn delay_by(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    /// Number of read calls issued so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), ReconnectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().await.as_ref() {
            Some(message) => Err(ReconnectError::storage(message.clone())),
            None => Ok(()),
        }
    }

    fn scoped_messages(&self, scope: &Scope, direction: Option<MessageDirection>) -> Vec<Message> {
        self.seed
            .messages
            .iter()
            .filter(|m| direction.is_none_or(|d| m.direction == d))
            .filter(|m| in_scope(scope, m.campaign_id.as_ref(), m.sent_at.as_ref()))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for MemoryEventStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ReconnectError> {
        Ok(match self.failure.lock().await.as_ref() {
            Some(message) => HealthStatus::Unhealthy(message.clone()),
            None => HealthStatus::Healthy,
        })
    }

    async fn shutdown(&self) -> Result<(), ReconnectError> {
        Ok(())
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn contact_attempts(&self, scope: &Scope) -> Result<Vec<ContactAttempt>, ReconnectError> {
        self.enter().await?;
        Ok(self
            .seed
            .attempts
            .iter()
            .filter(|a| in_scope(scope, a.campaign_id.as_ref(), a.sent_at.as_ref()))
            .cloned()
            .collect())
    }

    async fn messages(
        &self,
        scope: &Scope,
        direction: Option<MessageDirection>,
    ) -> Result<Vec<Message>, ReconnectError> {
        self.enter().await?;
        Ok(self.scoped_messages(scope, direction))
    }

    async fn prospect_responses(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ProspectResponse>, ReconnectError> {
        self.enter().await?;
        Ok(self
            .seed
            .responses
            .iter()
            .filter(|r| in_scope(scope, r.campaign_id.as_ref(), r.received_at.as_ref()))
            .cloned()
            .collect())
    }

    async fn vendor_notifications(
        &self,
        scope: &Scope,
    ) -> Result<Vec<VendorNotification>, ReconnectError> {
        self.enter().await?;
        Ok(self
            .seed
            .notifications
            .iter()
            .filter(|n| in_scope(scope, n.campaign_id.as_ref(), n.sent_at.as_ref()))
            .cloned()
            .collect())
    }

    async fn count_distinct_prospects(
        &self,
        query: ProspectCountQuery,
        scope: &Scope,
    ) -> Result<u64, ReconnectError> {
        self.enter().await?;
        let seed = &self.seed;
        let ids: HashSet<&ProspectId> = match query {
            ProspectCountQuery::Contacted => seed
                .attempts
                .iter()
                .filter(|a| in_scope(scope, a.campaign_id.as_ref(), a.sent_at.as_ref()))
                .map(|a| &a.prospect_id)
                .collect(),
            ProspectCountQuery::Responded | ProspectCountQuery::Qualified => seed
                .responses
                .iter()
                .filter(|r| in_scope(scope, r.campaign_id.as_ref(), r.received_at.as_ref()))
                .filter(|r| {
                    query == ProspectCountQuery::Responded
                        || r.qualification_result == QualificationResult::Interested
                })
                .map(|r| &r.prospect_id)
                .collect(),
            ProspectCountQuery::Engaged => seed
                .messages
                .iter()
                .filter(|m| m.direction == MessageDirection::Inbound)
                .filter(|m| in_scope(scope, m.campaign_id.as_ref(), m.sent_at.as_ref()))
                .map(|m| &m.prospect_id)
                .collect(),
            ProspectCountQuery::Notified => seed
                .notifications
                .iter()
                .filter(|n| in_scope(scope, n.campaign_id.as_ref(), n.sent_at.as_ref()))
                .map(|n| &n.prospect_id)
                .collect(),
        };
        Ok(ids.len() as u64)
    }

    async fn reconnected_prospects(&self, scope: &Scope) -> Result<Vec<Prospect>, ReconnectError> {
        self.enter().await?;
        let in_campaign: Option<HashSet<&ProspectId>> = scope.campaign_id.as_ref().map(|c| {
            self.seed
                .attempts
                .iter()
                .filter(|a| a.campaign_id.as_ref() == Some(c))
                .map(|a| &a.prospect_id)
                .collect()
        });
        let mut prospects: Vec<Prospect> = self
            .seed
            .prospects
            .iter()
            .filter(|p| p.qualification_status.is_reconnected())
            .filter(|p| in_campaign.as_ref().is_none_or(|ids| ids.contains(&p.id)))
            .filter(|p| match (&scope.range, &p.updated_at) {
                (None, _) => true,
                (Some(range), Some(at)) => range.contains(at),
                (Some(_), None) => false,
            })
            .cloned()
            .collect();
        prospects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(prospects)
    }

    async fn prospect(&self, id: &ProspectId) -> Result<Option<Prospect>, ReconnectError> {
        self.enter().await?;
        Ok(self.seed.prospects.iter().find(|p| &p.id == id).cloned())
    }

    async fn prospect_messages(&self, id: &ProspectId) -> Result<Vec<Message>, ReconnectError> {
        self.enter().await?;
        let mut messages: Vec<Message> = self
            .seed
            .messages
            .iter()
            .filter(|m| &m.prospect_id == id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| {
            (a.sent_at.is_none(), a.sent_at, &a.id).cmp(&(b.sent_at.is_none(), b.sent_at, &b.id))
        });
        Ok(messages)
    }

    async fn thread_summaries(
        &self,
        filter: &ThreadFilter,
    ) -> Result<Vec<ThreadSummary>, ReconnectError> {
        self.enter().await?;
        let needle = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let mut summaries: Vec<ThreadSummary> = self
            .seed
            .prospects
            .iter()
            .filter(|p| filter.status.as_ref().is_none_or(|s| &p.qualification_status == s))
            .filter(|p| {
                needle.as_deref().is_none_or(|needle| {
                    [p.firstname.as_deref(), p.lastname.as_deref(), p.company.as_deref()]
                        .into_iter()
                        .flatten()
                        .chain(std::iter::once(p.phone.as_str()))
                        .any(|field| field.to_lowercase().contains(needle))
                })
            })
            .filter_map(|p| {
                let thread: Vec<&Message> =
                    self.seed.messages.iter().filter(|m| m.prospect_id == p.id).collect();
                let latest = thread
                    .iter()
                    .max_by(|a, b| (a.sent_at, &a.id).cmp(&(b.sent_at, &b.id)))?;
                Some(ThreadSummary {
                    prospect: p.clone(),
                    last_message: Some(latest.content.clone()),
                    last_message_at: latest.sent_at,
                    last_direction: Some(latest.direction),
                    message_count: thread.len() as u64,
                })
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.last_message_at
                .cmp(&a.last_message_at)
                .then_with(|| a.prospect.id.cmp(&b.prospect.id))
        });
        Ok(summaries)
    }

    async fn vendor_aggregates(&self) -> Result<Vec<VendorAggregate>, ReconnectError> {
        self.enter().await?;
        let seed = &self.seed;
        let mut aggregates: Vec<VendorAggregate> = seed
            .vendors
            .iter()
            .filter(|v| v.active)
            .map(|v| {
                let assigned: Vec<&Prospect> = seed
                    .prospects
                    .iter()
                    .filter(|p| p.vendor_id.as_ref() == Some(&v.id))
                    .collect();
                let assigned_ids: HashSet<&ProspectId> = assigned.iter().map(|p| &p.id).collect();
                let responders = |callbacks_only: bool| {
                    seed.responses
                        .iter()
                        .filter(|r| assigned_ids.contains(&r.prospect_id))
                        .filter(|r| !callbacks_only || r.response_type.as_str() == "callback")
                        .map(|r| &r.prospect_id)
                        .collect::<HashSet<_>>()
                        .len() as u64
                };
                let with_status = |status: QualificationResult| {
                    assigned
                        .iter()
                        .filter(|p| p.qualification_status == status)
                        .count() as u64
                };
                VendorAggregate {
                    vendor_id: v.id.clone(),
                    vendor_name: v.name.clone(),
                    vendor_email: v.email.clone(),
                    total_prospects: assigned.len() as u64,
                    total_responses: responders(false),
                    callbacks: responders(true),
                    interested_prospects: with_status(QualificationResult::Interested),
                    not_interested_prospects: with_status(QualificationResult::NotInterested),
                }
            })
            .collect();
        aggregates.sort_by(|a, b| a.vendor_id.cmp(&b.vendor_id));
        Ok(aggregates)
    }

    async fn campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, ReconnectError> {
        self.enter().await?;
        Ok(self.seed.campaigns.iter().find(|c| &c.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, attempt};
    use reconnect_core::types::DateRange;

    #[tokio::test]
    async fn ranged_scope_excludes_undated_rows() {
        let mut undated = attempt("a2", "B", at(2026, 3, 2, 10, 0));
        undated.sent_at = None;
        let store = MemoryEventStore::new(
            Seed::new()
                .attempt(attempt("a1", "A", at(2026, 3, 2, 10, 0)))
                .attempt(undated),
        );
        let range = DateRange {
            start: at(2026, 3, 1, 0, 0),
            end: at(2026, 3, 31, 0, 0),
        };
        let rows = store
            .contact_attempts(&Scope::new(None, Some(range)))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.contact_attempts(&Scope::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_is_a_retryable_storage_error() {
        let store = MemoryEventStore::new(Seed::funnel_scenario());
        store.fail_with("connection reset").await;
        let err = store.vendor_aggregates().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.calls(), 1);
    }
}
