// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Reconnect integration tests.
//!
//! Provides fixture builders, an in-memory event store, and a temp-database
//! harness for fast, deterministic tests without an external store.
//!
//! # Components
//!
//! - [`Seed`] - a bundle of records loadable into either store
//! - [`MemoryEventStore`] - `EventStore` over in-memory vectors, with failure and delay injection
//! - [`TestHarness`] - a migrated SQLite store in a temp directory

pub mod fixtures;
pub mod harness;
pub mod memory_store;

pub use fixtures::Seed;
pub use harness::TestHarness;
pub use memory_store::MemoryEventStore;
