//! The presence record and its staleness policy.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_STALENESS_MS, MAX_STALENESS_MS, MIN_STALENESS_MS};
use crate::error::{Error, Result};

/// Latest known state of one publisher.
///
/// Written whole by every heartbeat (never merged) and stored as camelCase
/// JSON. `max_players` and `heartbeat_interval_sec` are also accepted on read
/// for records written by older publishers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub status: String,
    pub players: u32,
    #[serde(alias = "max_players")]
    pub max_players: u32,
    pub tps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
    pub version: String,
    /// Server-assigned write time, epoch milliseconds.
    pub timestamp: i64,
    /// How often the publisher promises to report, in seconds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "heartbeat_interval_sec"
    )]
    pub heartbeat_interval_sec: Option<i64>,
}

impl PresenceRecord {
    /// Decodes a record read back from the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStoredRecord`] if the bytes are not a
    /// well-typed record.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedStoredRecord(e.to_string()))
    }

    /// Encodes the record for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (non-finite `tps`
    /// serializes as `null`, so in practice this does not fail).
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::malformed(e.to_string()))
    }

    /// Age beyond which the record counts as offline, in milliseconds.
    ///
    /// Twice the announced heartbeat interval, clamped to 60..=300 seconds;
    /// 300 seconds when no positive interval was announced.
    pub fn staleness_threshold_ms(&self) -> i64 {
        match self.heartbeat_interval_sec {
            Some(interval) if interval > 0 => interval
                .saturating_mul(2_000)
                .clamp(MIN_STALENESS_MS, MAX_STALENESS_MS),
            _ => DEFAULT_STALENESS_MS,
        }
    }

    /// Returns true if the record is too old to be shown as live at `now_ms`.
    pub fn is_stale_at(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) > self.staleness_threshold_ms()
    }
}
