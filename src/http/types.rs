//! Request and response types for the HTTP API.

use serde::Serialize;

use crate::badge::BadgeOptions;

/// Body of a successful `POST /api/heartbeat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub success: bool,
    pub public_id: String,
    pub message: String,
}

/// Body of every JSON error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

/// Parsed `GET /api/badge` query.
#[derive(Debug, Default)]
pub(crate) struct BadgeQuery {
    pub id: Option<String>,
    pub badge_type: Option<String>,
    pub options: BadgeOptions,
}

impl BadgeQuery {
    /// Builds the query from decoded pairs.
    ///
    /// The first occurrence of a parameter wins, empty values count as
    /// absent and unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            let options = &mut query.options;
            let slot = match key.as_str() {
                "id" => &mut query.id,
                "type" => &mut query.badge_type,
                "style" => &mut options.style,
                "logo" => &mut options.logo,
                "logoBase64" => &mut options.logo_base64,
                "logoColor" => &mut options.logo_color,
                "logoSize" => &mut options.logo_size,
                "label" => &mut options.label,
                "labelColor" => &mut options.label_color,
                "color" => &mut options.color,
                "link" => &mut options.link,
                "cacheSeconds" => {
                    if options.cache_seconds.is_none() {
                        options.cache_seconds = BadgeOptions::parse_cache_seconds(&value);
                    }
                    continue;
                },
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}
