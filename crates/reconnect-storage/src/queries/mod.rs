// SPDX-FileCopyrightText: 2026 Reconnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries over the event tables.
//!
//! Rows are converted to `reconnect_core::types` records here and nowhere
//! else. Timestamps are stored as UTC text in [`TIMESTAMP_FORMAT`], which
//! sorts and range-compares correctly as plain strings.

pub mod attempts;
pub mod campaigns;
pub mod counts;
pub mod messages;
pub mod notifications;
pub mod prospects;
pub mod responses;
pub mod vendors;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use reconnect_core::types::Scope;
use rusqlite::types::Type;

/// Storage format of every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format a timestamp for storage or range comparison.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Read a nullable timestamp column.
///
/// A present but unparseable value is a conversion failure, never a silent null.
pub(crate) fn timestamp_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Read a text column into a strum-parsed enum.
pub(crate) fn enum_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a non-negative count column.
pub(crate) fn count_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let n: i64 = row.get(idx)?;
    u64::try_from(n)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

/// A `WHERE` clause assembled from numbered text parameters.
#[derive(Debug, Default)]
pub(crate) struct Filter {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl Filter {
    /// Campaign and inclusive time-range predicates for one table.
    pub(crate) fn scoped(scope: &Scope, campaign_column: &str, time_column: &str) -> Self {
        let mut filter = Self::default();
        if let Some(campaign_id) = &scope.campaign_id {
            filter.bind(&format!("{campaign_column} = ?"), campaign_id.0.clone());
        }
        if let Some(range) = &scope.range {
            filter.bind(&format!("{time_column} >= ?"), format_timestamp(&range.start));
            filter.bind(&format!("{time_column} <= ?"), format_timestamp(&range.end));
        }
        filter
    }

    /// Add a clause containing exactly one `?`, bound to `value`.
    pub(crate) fn bind(&mut self, clause: &str, value: String) -> &mut Self {
        self.params.push(value);
        let numbered = format!("?{}", self.params.len());
        self.clauses.push(clause.replacen('?', &numbered, 1));
        self
    }

    /// Add a clause with no parameters.
    pub(crate) fn push(&mut self, clause: &str) -> &mut Self {
        self.clauses.push(clause.to_string());
        self
    }

    /// `" WHERE a AND b"`, or an empty string when there are no clauses.
    pub(crate) fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn params(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, String>> {
        rusqlite::params_from_iter(self.params.iter())
    }
}
