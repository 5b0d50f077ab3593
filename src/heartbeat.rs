//! Heartbeat ingestion.
//!
//! A publisher POSTs its secret token and current state. The ingestor
//! validates the body, derives the public id and writes one
//! [`PresenceRecord`] with a fixed TTL. Validation failures never touch the
//! store.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::constants::{HEARTBEAT_OK_MESSAGE, HEARTBEAT_TTL};
use crate::error::{Error, Result};
use crate::metrics;
use crate::presence::PresenceRecord;
use crate::store::PresenceStore;
use crate::token::SecretToken;

/// Wire shape of `POST /api/heartbeat`.
#[derive(Deserialize)]
struct HeartbeatRequest {
    token: Option<String>,
    data: Option<HeartbeatData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeartbeatData {
    status: String,
    players: u32,
    max_players: Option<u32>,
    /// Field name used by older publishers.
    #[serde(rename = "max_players")]
    legacy_max_players: Option<u32>,
    tps: f64,
    software: Option<String>,
    version: String,
    #[serde(alias = "heartbeat_interval_sec")]
    heartbeat_interval_sec: Option<i64>,
}

/// A parsed, not yet authenticated heartbeat.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    pub token: SecretToken,
    pub status: String,
    pub players: u32,
    pub max_players: u32,
    pub tps: f64,
    pub software: Option<String>,
    pub version: String,
    pub heartbeat_interval_sec: Option<i64>,
}

impl Heartbeat {
    /// Parses a raw request body.
    ///
    /// `maxPlayers` and the legacy `max_players` are both accepted; when a
    /// body carries both, `maxPlayers` wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRequest`] for invalid JSON, missing
    /// `token`/`data`, missing fields or mistyped fields.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let request: HeartbeatRequest = serde_json::from_slice(raw)
            .map_err(|e| Error::malformed(format!("Malformed request: {e}")))?;

        let (Some(token), Some(data)) = (request.token, request.data) else {
            return Err(Error::malformed("Missing required fields: token and data"));
        };

        let max_players = data
            .max_players
            .or(data.legacy_max_players)
            .ok_or_else(|| Error::malformed("Missing required field: maxPlayers"))?;

        Ok(Self {
            token: SecretToken::new(token),
            status: data.status,
            players: data.players,
            max_players,
            tps: data.tps,
            software: data.software,
            version: data.version,
            heartbeat_interval_sec: data.heartbeat_interval_sec,
        })
    }

    /// Turns the heartbeat into a record stamped with `timestamp`.
    pub fn into_record(self, timestamp: i64) -> PresenceRecord {
        PresenceRecord {
            status: self.status,
            players: self.players,
            max_players: self.max_players,
            tps: self.tps,
            software: self.software,
            version: self.version,
            timestamp,
            heartbeat_interval_sec: self.heartbeat_interval_sec,
        }
    }
}

/// Successful ingestion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatAck {
    /// Identifier the publisher puts in badge URLs.
    pub public_id: String,
    pub message: &'static str,
}

/// Validates heartbeats and writes presence records.
#[derive(Clone)]
pub struct HeartbeatIngestor {
    store: PresenceStore,
    clock: Arc<dyn Clock>,
}

impl HeartbeatIngestor {
    pub fn new(store: PresenceStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Ingests one raw heartbeat body.
    ///
    /// Performs exactly one store write on success and none on failure.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedRequest`] if the body can't be parsed
    /// - [`Error::InvalidTokenFormat`] if the token isn't `sk_live_<uuid v4>`
    /// - [`Error::StorageUnavailable`] if the write fails
    pub async fn ingest(&self, raw: &[u8]) -> Result<HeartbeatAck> {
        let heartbeat = Heartbeat::parse(raw).inspect_err(|e| {
            debug!(error = %e, "Rejected malformed heartbeat");
            metrics::record_heartbeat("malformed");
        })?;

        if !heartbeat.token.is_valid() {
            debug!("Rejected heartbeat with invalid token format");
            metrics::record_heartbeat("invalid_token");
            return Err(Error::InvalidTokenFormat);
        }

        let public_id = heartbeat.token.public_id();
        let record = heartbeat.into_record(self.clock.now_millis());
        let payload = record.to_vec()?;

        if let Err(e) = self
            .store
            .put(&public_id, &payload, Some(HEARTBEAT_TTL))
            .await
        {
            let detail = format!("{e:#}");
            error!(
                %public_id,
                backend = self.store.backend_name(),
                error = %detail,
                "Failed to store heartbeat"
            );
            metrics::record_heartbeat("storage_error");
            return Err(Error::storage(&e));
        }

        info!(
            %public_id,
            status = %record.status,
            players = record.players,
            max_players = record.max_players,
            "Heartbeat recorded"
        );
        metrics::record_heartbeat("ok");

        Ok(HeartbeatAck {
            public_id,
            message: HEARTBEAT_OK_MESSAGE,
        })
    }
}
