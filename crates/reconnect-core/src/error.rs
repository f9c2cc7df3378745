// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Reconnect analytics service.

use thiserror::Error;

use crate::types::AggregatorKind;

/// The primary error type used across the event store contract and all aggregators.
#[derive(Debug, Error)]
pub enum ReconnectError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, row conversion).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed scope or filter input. Raised before any store query is issued.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A store query exceeded its time budget.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A failure inside one aggregator, tagged with the aggregator and scope.
    #[error("{aggregator} aggregation failed for {scope}: {source}")]
    Aggregation {
        aggregator: AggregatorKind,
        scope: String,
        source: Box<ReconnectError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ReconnectError {
    /// Build a storage error from a plain message.
    pub fn storage(message: impl Into<String>) -> Self {
        ReconnectError::Storage {
            source: message.into().into(),
        }
    }

    /// Whether retrying the whole call may succeed.
    ///
    /// Store failures and timeouts are transient; validation and internal
    /// faults will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReconnectError::Storage { .. } | ReconnectError::Timeout { .. } => true,
            ReconnectError::Aggregation { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// The innermost error, looking through aggregation wrappers.
    pub fn root(&self) -> &ReconnectError {
        match self {
            ReconnectError::Aggregation { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn storage_and_timeout_are_retryable() {
        assert!(ReconnectError::storage("disk I/O error").is_retryable());
        assert!(
            ReconnectError::Timeout {
                duration: Duration::from_secs(10)
            }
            .is_retryable()
        );
        assert!(!ReconnectError::Validation("bad date".into()).is_retryable());
        assert!(!ReconnectError::Internal("oops".into()).is_retryable());
    }

    #[test]
    fn aggregation_wrapper_delegates_to_source() {
        let err = ReconnectError::Aggregation {
            aggregator: AggregatorKind::Funnel,
            scope: "campaign=c1".into(),
            source: Box::new(ReconnectError::Timeout {
                duration: Duration::from_secs(1),
            }),
        };
        assert!(err.is_retryable());
        assert!(matches!(err.root(), ReconnectError::Timeout { .. }));
        let rendered = err.to_string();
        assert!(rendered.starts_with("funnel aggregation failed for campaign=c1"));
    }
}
