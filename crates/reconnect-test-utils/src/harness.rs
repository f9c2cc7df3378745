// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-database harness for integration tests.
//!
//! `TestHarness` opens a migrated SQLite event store in a temp directory and
//! loads a [`Seed`] into it through the store's typed writers.

use std::sync::Arc;

use reconnect_config::model::StorageConfig;
use reconnect_core::ReconnectError;
use reconnect_storage::SqliteEventStore;

use crate::fixtures::Seed;

/// A seeded SQLite event store that lives as long as the harness.
pub struct TestHarness {
    /// The event store (temp DB, removed on drop).
    pub store: Arc<SqliteEventStore>,
    /// Storage configuration pointing at the temp DB.
    pub storage_config: StorageConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Open an empty store.
    pub async fn new() -> Result<Self, ReconnectError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| ReconnectError::Storage { source: e.into() })?;
        let storage_config = StorageConfig {
            database_path: temp_dir
                .path()
                .join("events.db")
                .to_string_lossy()
                .into_owned(),
            ..StorageConfig::default()
        };
        let store = SqliteEventStore::new(storage_config.clone());
        store.initialize().await?;
        Ok(Self {
            store: Arc::new(store),
            storage_config,
            _temp_dir: temp_dir,
        })
    }

    /// Open a store and load `seed` into it.
    pub async fn with_seed(seed: &Seed) -> Result<Self, ReconnectError> {
        let harness = Self::new().await?;
        harness.load(seed).await?;
        Ok(harness)
    }

    /// Insert every record of `seed`.
    pub async fn load(&self, seed: &Seed) -> Result<(), ReconnectError> {
        for vendor in &seed.vendors {
            self.store.upsert_vendor(vendor).await?;
        }
        for campaign in &seed.campaigns {
            self.store.upsert_campaign(campaign).await?;
        }
        for prospect in &seed.prospects {
            self.store.upsert_prospect(prospect).await?;
        }
        for attempt in &seed.attempts {
            self.store.insert_attempt(attempt).await?;
        }
        for message in &seed.messages {
            self.store.insert_message(message).await?;
        }
        for response in &seed.responses {
            self.store.insert_response(response).await?;
        }
        for notification in &seed.notifications {
            self.store.insert_notification(notification).await?;
        }
        tracing::debug!(
            attempts = seed.attempts.len(),
            messages = seed.messages.len(),
            prospects = seed.prospects.len(),
            "test seed loaded"
        );
        Ok(())
    }
}
