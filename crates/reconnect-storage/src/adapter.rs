// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the EventStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use reconnect_config::model::StorageConfig;
use reconnect_core::types::{
    Campaign, CampaignId, ContactAttempt, Message, MessageDirection, Prospect, ProspectCountQuery,
    ProspectId, ProspectResponse, Scope, ThreadFilter, ThreadSummary, Vendor, VendorAggregate,
    VendorNotification,
};
use reconnect_core::{AdapterType, EventStore, HealthStatus, PluginAdapter, ReconnectError};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed event store.
///
/// The database is opened lazily by [`SqliteEventStore::initialize`]; every
/// read before that fails with a storage error.
pub struct SqliteEventStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteEventStore {
    /// Create a store for `config` without opening the database.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self {
            config: StorageConfig::default(),
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// Open an initialized store over a private in-memory database.
    pub async fn in_memory() -> Result<Self, ReconnectError> {
        Ok(Self::from_database(Database::open_in_memory().await?))
    }

    /// Open and migrate the configured database.
    pub async fn initialize(&self) -> Result<(), ReconnectError> {
        let db = Database::open_with(&self.config).await?;
        self.db
            .set(db)
            .map_err(|_| ReconnectError::storage("event store already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite event store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, ReconnectError> {
        self.db
            .get()
            .ok_or_else(|| ReconnectError::storage("event store not initialized"))
    }

    // Writers below exist for seeding and fixtures. Production rows are
    // written by the outreach workflow, not by this service.

    pub async fn insert_attempt(&self, attempt: &ContactAttempt) -> Result<(), ReconnectError> {
        queries::attempts::insert_attempt(self.db()?, attempt).await
    }

    pub async fn insert_message(&self, message: &Message) -> Result<(), ReconnectError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    pub async fn insert_response(&self, response: &ProspectResponse) -> Result<(), ReconnectError> {
        queries::responses::insert_response(self.db()?, response).await
    }

    pub async fn insert_notification(
        &self,
        notification: &VendorNotification,
    ) -> Result<(), ReconnectError> {
        queries::notifications::insert_notification(self.db()?, notification).await
    }

    pub async fn upsert_prospect(&self, prospect: &Prospect) -> Result<(), ReconnectError> {
        queries::prospects::upsert_prospect(self.db()?, prospect).await
    }

    pub async fn upsert_vendor(&self, vendor: &Vendor) -> Result<(), ReconnectError> {
        queries::vendors::upsert_vendor(self.db()?, vendor).await
    }

    pub async fn upsert_campaign(&self, campaign: &Campaign) -> Result<(), ReconnectError> {
        queries::campaigns::upsert_campaign(self.db()?, campaign).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteEventStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ReconnectError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), ReconnectError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn contact_attempts(&self, scope: &Scope) -> Result<Vec<ContactAttempt>, ReconnectError> {
        queries::attempts::list_attempts(self.db()?, scope).await
    }

    async fn messages(
        &self,
        scope: &Scope,
        direction: Option<MessageDirection>,
    ) -> Result<Vec<Message>, ReconnectError> {
        queries::messages::list_messages(self.db()?, scope, direction).await
    }

    async fn prospect_responses(
        &self,
        scope: &Scope,
    ) -> Result<Vec<ProspectResponse>, ReconnectError> {
        queries::responses::list_responses(self.db()?, scope).await
    }

    async fn vendor_notifications(
        &self,
        scope: &Scope,
    ) -> Result<Vec<VendorNotification>, ReconnectError> {
        queries::notifications::list_notifications(self.db()?, scope).await
    }

    async fn count_distinct_prospects(
        &self,
        query: ProspectCountQuery,
        scope: &Scope,
    ) -> Result<u64, ReconnectError> {
        queries::counts::count_distinct_prospects(self.db()?, query, scope).await
    }

    async fn reconnected_prospects(&self, scope: &Scope) -> Result<Vec<Prospect>, ReconnectError> {
        queries::prospects::reconnected_prospects(self.db()?, scope).await
    }

    async fn prospect(&self, id: &ProspectId) -> Result<Option<Prospect>, ReconnectError> {
        queries::prospects::get_prospect(self.db()?, id).await
    }

    async fn prospect_messages(&self, id: &ProspectId) -> Result<Vec<Message>, ReconnectError> {
        queries::messages::messages_for_prospect(self.db()?, id).await
    }

    async fn thread_summaries(
        &self,
        filter: &ThreadFilter,
    ) -> Result<Vec<ThreadSummary>, ReconnectError> {
        queries::prospects::thread_summaries(self.db()?, filter).await
    }

    async fn vendor_aggregates(&self) -> Result<Vec<VendorAggregate>, ReconnectError> {
        queries::vendors::vendor_aggregates(self.db()?).await
    }

    async fn campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, ReconnectError> {
        queries::campaigns::get_campaign(self.db()?, id).await
    }
}
