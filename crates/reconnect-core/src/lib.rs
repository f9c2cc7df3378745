// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Reconnect outreach analytics service.
//!
//! This crate provides the error taxonomy, the typed event records, the
//! aggregation scope, and the [`EventStore`] read contract that every
//! aggregator is written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ReconnectError;
pub use types::{
    AdapterType, AggregatorKind, CampaignId, DateRange, HealthStatus, ProspectId, Scope,
    VendorId,
};

pub use traits::{EventStore, PluginAdapter};
