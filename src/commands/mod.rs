//! CLI command implementations for pulse.
//!
//! - [`serve`] - HTTP server for heartbeats and badges
//! - [`token`] - Secret token generation and public id lookup

pub mod serve;
pub mod token;
