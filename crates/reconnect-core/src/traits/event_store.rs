// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read contract over the outreach event store.

use async_trait::async_trait;

use crate::error::ReconnectError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Campaign, CampaignId, ContactAttempt, Message, MessageDirection, Prospect, ProspectCountQuery,
    ProspectId, ProspectResponse, Scope, ThreadFilter, ThreadSummary, VendorAggregate,
    VendorNotification,
};

/// Read-only access to contact attempts, messages, responses, vendor
/// notifications, and the slowly-changing prospect, vendor, and campaign tables.
///
/// Every scoped query filters on `campaign_id` when the scope names one and on
/// the table's own timestamp column (inclusive on both ends) when the scope
/// carries a range. Rows with a null timestamp never match a ranged scope.
#[async_trait]
pub trait EventStore: PluginAdapter {
    /// Contact attempts in scope, ordered by `sent_at`.
    async fn contact_attempts(&self, scope: &Scope) -> Result<Vec<ContactAttempt>, ReconnectError>;

    /// Messages in scope, optionally restricted to one direction.
    async fn messages(
        &self,
        scope: &Scope,
        direction: Option<MessageDirection>,
    ) -> Result<Vec<Message>, ReconnectError>;

    /// Classified responses in scope, ordered by `received_at`.
    async fn prospect_responses(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ProspectResponse>, ReconnectError>;

    /// Vendor notifications in scope, ordered by `sent_at`.
    async fn vendor_notifications(
        &self,
        scope: &Scope,
    ) -> Result<Vec<VendorNotification>, ReconnectError>;

    /// Distinct prospects matching one funnel predicate in scope.
    async fn count_distinct_prospects(
        &self,
        query: ProspectCountQuery,
        scope: &Scope,
    ) -> Result<u64, ReconnectError>;

    /// Prospects whose status is interested or not interested.
    ///
    /// A campaign scope restricts to prospects with an attempt in that
    /// campaign; a range restricts on the prospect's `updated_at`.
    async fn reconnected_prospects(&self, scope: &Scope) -> Result<Vec<Prospect>, ReconnectError>;

    /// A single prospect by id.
    async fn prospect(&self, id: &ProspectId) -> Result<Option<Prospect>, ReconnectError>;

    /// All messages of one prospect, ordered by `sent_at` ascending.
    async fn prospect_messages(&self, id: &ProspectId) -> Result<Vec<Message>, ReconnectError>;

    /// Latest-message summaries for prospects that have at least one message.
    async fn thread_summaries(
        &self,
        filter: &ThreadFilter,
    ) -> Result<Vec<ThreadSummary>, ReconnectError>;

    /// One aggregate row per vendor.
    async fn vendor_aggregates(&self) -> Result<Vec<VendorAggregate>, ReconnectError>;

    /// A single campaign by id.
    async fn campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, ReconnectError>;
}
