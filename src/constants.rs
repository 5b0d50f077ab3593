//! Shared constants for the presence registry and badge renderer.

use std::time::Duration;

/// Prefix every secret token starts with.
pub const SECRET_TOKEN_PREFIX: &str = "sk_live_";

/// Prefix every public identifier starts with.
pub const PUBLIC_ID_PREFIX: &str = "srv_pub_";

/// Minimum total length of a secret token (prefix + UUID).
pub const SECRET_TOKEN_MIN_LEN: usize = 40;

/// Number of hex characters of the SHA-256 digest kept in a public id.
pub const PUBLIC_ID_HEX_LEN: usize = 12;

/// Time-to-live applied to every heartbeat write.
pub const HEARTBEAT_TTL: Duration = Duration::from_secs(300);

/// Staleness threshold used when the publisher did not announce an interval.
pub const DEFAULT_STALENESS_MS: i64 = 300_000;

/// Lower bound of the interval-derived staleness threshold.
pub const MIN_STALENESS_MS: i64 = 60_000;

/// Upper bound of the interval-derived staleness threshold.
pub const MAX_STALENESS_MS: i64 = 300_000;

/// Badge image cache duration when the caller does not ask for one.
pub const DEFAULT_CACHE_SECONDS: i64 = 60;

/// Longest badge image cache duration a caller may request.
pub const MAX_CACHE_SECONDS: i64 = 86_400;

/// Confirmation returned to publishers on a recorded heartbeat.
pub const HEARTBEAT_OK_MESSAGE: &str = "Heartbeat recorded successfully";

/// Default listen address for `pulse serve`.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

/// Default key namespace for shared backends (Redis, blob store).
pub const DEFAULT_NAMESPACE: &str = "pulse";

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "pulse.toml";
