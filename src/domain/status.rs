// Entry status domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Loading,
    Up,
    Down,
    Error,
    #[default]
    Unknown,
}

/// Most-recent status for a single entry. Lives only in the status cache,
/// never persisted; recomputed from scratch on every probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTuple {
    pub entry_id: String,
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl StatusTuple {
    /// Placeholder published between the first subscribe and the first
    /// probe result.
    pub fn loading(entry_id: &str) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            status: EntryStatus::Loading,
            response_time: None,
            last_checked: None,
        }
    }

    /// Result of a failed probe. Still a valid tuple; retried on the next
    /// sweep.
    pub fn unknown(entry_id: &str) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            status: EntryStatus::Unknown,
            response_time: None,
            last_checked: Some(Utc::now()),
        }
    }

    pub fn from_reading(entry_id: &str, reading: ProbeReading) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            status: reading.status,
            response_time: reading.response_time,
            last_checked: Some(reading.last_checked.unwrap_or_else(Utc::now)),
        }
    }
}

/// What the probe transport returns for one check. A missing status field
/// decodes as `unknown`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReading {
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default)]
    pub response_time: Option<i64>,
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}
