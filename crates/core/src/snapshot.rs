// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue snapshot data model.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A full, self-consistent copy of one establishment's queue at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Establishment the queue belongs to.
    ///
    /// The queue endpoint omits it; the pull client fills it in from the request.
    #[serde(default)]
    pub establishment_id: String,
    /// Number currently being served.
    pub current_serving: u64,
    /// People waiting behind the current number.
    pub total_waiting: u64,
    /// Ticket numbers still available for purchase, in order.
    #[serde(default)]
    pub available_numbers: Vec<u64>,
    /// When the service (or this client, for push updates) last changed the queue.
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl QueueSnapshot {
    /// An empty queue for the given establishment, serving number 0.
    pub fn empty(establishment_id: impl Into<String>) -> Self {
        QueueSnapshot {
            establishment_id: establishment_id.into(),
            current_serving: 0,
            total_waiting: 0,
            available_numbers: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

/// Queue fields carried by a push `queue_update` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueFields {
    pub current_serving: u64,
    pub total_waiting: u64,
    #[serde(default)]
    pub available_numbers: Vec<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
}

/// Accepts RFC 3339, naive ISO 8601 (taken as UTC), or epoch milliseconds.
///
/// Anything else resolves to the time of receipt rather than failing the
/// whole snapshot.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(raw.and_then(parse_timestamp).unwrap_or_else(Utc::now))
}

fn parse_timestamp(raw: RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
