//! Secret token and public identifier codec.
//!
//! A publisher holds a secret token (`sk_live_<uuid v4>`). The registry never
//! stores it: every heartbeat re-derives the public identifier
//! (`srv_pub_<12 hex>`) with SHA-256, and only that identifier is used as the
//! store key and in badge URLs.
//!
//! The identifier keeps 48 bits of the digest. Collisions between two tokens
//! are possible in principle and are not detected.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::constants::{
    PUBLIC_ID_HEX_LEN, PUBLIC_ID_PREFIX, SECRET_TOKEN_MIN_LEN, SECRET_TOKEN_PREFIX,
};

/// A publisher's secret token.
///
/// `Debug` is redacted so the token can't end up in logs by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    /// Wraps a raw token string without validating it.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is well formed.
    pub fn is_valid(&self) -> bool {
        validate_secret_token(&self.0)
    }

    /// Derives the public identifier for this token.
    pub fn public_id(&self) -> String {
        derive_public_id(&self.0)
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(\"sk_live_***\")")
    }
}

/// Derives the public identifier for a secret token.
///
/// The `sk_live_` prefix is stripped when present, the remainder is hashed
/// with SHA-256 and the first 12 hex characters are kept.
///
/// # Examples
///
/// ```
/// use pulse::token::derive_public_id;
///
/// let id = derive_public_id("sk_live_550e8400-e29b-41d4-a716-446655440000");
/// assert_eq!(id, "srv_pub_a3a9e1ed9732");
/// ```
pub fn derive_public_id(token: &str) -> String {
    let material = token.strip_prefix(SECRET_TOKEN_PREFIX).unwrap_or(token);
    let digest = Sha256::digest(material.as_bytes());
    let hex = hex::encode(digest);
    format!("{PUBLIC_ID_PREFIX}{}", &hex[..PUBLIC_ID_HEX_LEN])
}

/// Returns true if `token` is `sk_live_` followed by a canonical UUID v4.
pub fn validate_secret_token(token: &str) -> bool {
    if token.is_empty() || token.len() < SECRET_TOKEN_MIN_LEN {
        return false;
    }

    token
        .strip_prefix(SECRET_TOKEN_PREFIX)
        .is_some_and(is_uuid_v4)
}

/// Returns true if `id` is `srv_pub_` followed by exactly 12 hex characters.
pub fn validate_public_id(id: &str) -> bool {
    id.strip_prefix(PUBLIC_ID_PREFIX).is_some_and(|hash| {
        hash.len() == PUBLIC_ID_HEX_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit())
    })
}

/// Generates a fresh secret token from a random UUID v4.
pub fn generate_secret_token() -> SecretToken {
    SecretToken(format!("{SECRET_TOKEN_PREFIX}{}", uuid::Uuid::new_v4()))
}

/// Checks the 8-4-4-4-12 layout, the version nibble and the variant nibble.
fn is_uuid_v4(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != 36 {
        return false;
    }

    for (i, &b) in bytes.iter().enumerate() {
        let ok = match i {
            8 | 13 | 18 | 23 => b == b'-',
            14 => b == b'4',
            19 => matches!(b.to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b'),
            _ => b.is_ascii_hexdigit(),
        };
        if !ok {
            return false;
        }
    }

    true
}
