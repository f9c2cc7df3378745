// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do not open additional connections to the same file for writes.

use std::path::Path;
use std::time::Duration;

use reconnect_config::model::StorageConfig;
use reconnect_core::ReconnectError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into `ReconnectError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ReconnectError {
    ReconnectError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the migrated SQLite event store.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` with default settings.
    pub async fn open(path: &str) -> Result<Self, ReconnectError> {
        let config = StorageConfig {
            database_path: path.to_string(),
            ..StorageConfig::default()
        };
        Self::open_with(&config).await
    }

    /// Open the database described by `config`, apply PRAGMAs, and migrate.
    pub async fn open_with(config: &StorageConfig) -> Result<Self, ReconnectError> {
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ReconnectError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(&config.database_path)
            .await
            .map_err(|e| ReconnectError::Storage {
                source: Box::new(e),
            })?;

        let wal_mode = config.wal_mode;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.busy_timeout(busy_timeout)?;
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            }
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        let db = Self { conn };
        db.migrate().await?;
        debug!(path = %config.database_path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the full schema applied.
    pub async fn open_in_memory() -> Result<Self, ReconnectError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| ReconnectError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<(), ReconnectError> {
        // The closure itself cannot fail with a rusqlite error; the migration
        // outcome travels back as the inner result.
        self.conn
            .call(|conn| Ok::<_, rusqlite::Error>(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)?
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main file.
    pub async fn checkpoint(&self) -> Result<(), ReconnectError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), ReconnectError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| ReconnectError::Storage {
            source: Box::new(e),
        })?;
        debug!("database closed");
        Ok(())
    }
}
