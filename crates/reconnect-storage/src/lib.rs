// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite event store for the Reconnect analytics service.
//!
//! Provides WAL-mode SQLite access with embedded migrations, a single
//! background connection via `tokio-rusqlite`, and typed read queries over
//! contact attempts, SMS messages, classified responses, vendor
//! notifications, prospects, vendors, and campaigns.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteEventStore;
pub use database::Database;
