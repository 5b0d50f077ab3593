//! Presence registry and live status badges.
//!
//! Publishers (game servers, bots, apps) POST a heartbeat carrying a secret
//! token and their current state. Viewers embed an SVG badge addressed by a
//! public id derived from that token. The badge shows the latest state, or
//! `offline` once heartbeats stop.
//!
//! - [`token`] - secret token and public id codec
//! - [`store`] - pluggable key-value backends with TTL
//! - [`heartbeat`] - heartbeat validation and ingestion
//! - [`badge`] - badge state machine and SVG rendering
//! - [`http`] - axum router

pub mod badge;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod heartbeat;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod presence;
pub mod store;
pub mod token;

pub use error::{Error, Result};
