//! Live status badges.
//!
//! [`BadgeRenderer`] turns the stored presence record of a public id into an
//! SVG image. Rendering never fails past this boundary: every problem
//! becomes an error badge with a matching status code.
//!
//! # States
//!
//! | condition | badge | status |
//! |---|---|---|
//! | no id | `error: Missing ID` | 400 |
//! | malformed id | `error: Invalid ID` | 400 |
//! | unknown style, undecodable link | `error: Error` | 400 |
//! | store failure | `error: Storage unavailable` | 500 |
//! | no record | `server: offline` | 200 |
//! | unreadable record | `error: Error` | 400 |
//! | stale record | `server: offline` | 200 |
//! | fresh record | depends on the badge type | 200 |

pub mod color;
pub mod logo;
pub mod options;
pub mod svg;

use std::sync::Arc;

use tracing::{debug, error, warn};

pub use self::logo::{BuiltinIcons, LogoResolver};
pub use self::options::{BadgeOptions, Decoration, OptionsError, cache_control};
pub use self::svg::{BadgeSpec, BadgeStyle, Logo};

use self::color::{DEFAULT_LABEL_COLOR, ERROR_COLOR, to_svg_color, tps_color};
use crate::clock::Clock;
use crate::metrics;
use crate::presence::PresenceRecord;
use crate::store::PresenceStore;
use crate::token::validate_public_id;

/// Which facet of the record a badge shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeKind {
    #[default]
    Status,
    Players,
    Tps,
    Software,
    Version,
}

impl BadgeKind {
    /// Parses the `type` query value. Absent or unknown values give
    /// [`BadgeKind::Status`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("players") => Self::Players,
            Some("tps") => Self::Tps,
            Some("software") => Self::Software,
            Some("version") => Self::Version,
            _ => Self::Status,
        }
    }

    /// Default label, message and color for a live record.
    fn describe(self, record: &PresenceRecord) -> (&'static str, String, &'static str) {
        match self {
            Self::Status => (
                "server",
                record.status.clone(),
                if record.status == "online" {
                    "brightgreen"
                } else {
                    "red"
                },
            ),
            Self::Players => (
                "players",
                format!("{}/{}", record.players, record.max_players),
                "blue",
            ),
            Self::Tps => ("tps", format!("{:.1}", record.tps), tps_color(record.tps)),
            Self::Software => match record.software.as_deref().map(str::trim) {
                Some(software) if !software.is_empty() => {
                    ("software", software.to_string(), "blueviolet")
                },
                _ => ("software", "unknown".to_string(), "lightgrey"),
            },
            Self::Version => ("version", record.version.clone(), "informational"),
        }
    }
}

/// A rendered badge with its HTTP metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBadge {
    pub svg: String,
    pub status: u16,
    pub cache_control: String,
}

/// Reads presence records and renders badges.
#[derive(Clone)]
pub struct BadgeRenderer {
    store: PresenceStore,
    logos: Arc<dyn LogoResolver>,
    clock: Arc<dyn Clock>,
}

impl BadgeRenderer {
    /// Creates a renderer using the built-in icon set.
    pub fn new(store: PresenceStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            logos: Arc::new(BuiltinIcons),
            clock,
        }
    }

    /// Replaces the logo resolver.
    #[must_use]
    pub fn with_logos(mut self, logos: Arc<dyn LogoResolver>) -> Self {
        self.logos = logos;
        self
    }

    /// Renders the badge for `public_id`.
    pub async fn render(
        &self,
        public_id: Option<&str>,
        badge_type: Option<&str>,
        options: &BadgeOptions,
    ) -> RenderedBadge {
        let decoration = options.resolve(self.logos.as_ref());

        let Some(public_id) = public_id.filter(|id| !id.is_empty()) else {
            return error_badge("Missing ID", 400, decoration.ok().as_ref());
        };
        if !validate_public_id(public_id) {
            return error_badge("Invalid ID", 400, decoration.ok().as_ref());
        }
        let decoration = match decoration {
            Ok(decoration) => decoration,
            Err(e) => {
                debug!(%public_id, error = %e, "Rejected badge options");
                return error_badge("Error", 400, None);
            },
        };

        let bytes = match self.store.get(public_id).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return offline_badge(&decoration, options),
            Err(e) => {
                let detail = format!("{e:#}");
                error!(
                    %public_id,
                    backend = self.store.backend_name(),
                    error = %detail,
                    "Failed to read presence record"
                );
                return error_badge("Storage unavailable", 500, Some(&decoration));
            },
        };

        let record = match PresenceRecord::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(%public_id, error = %e, "Unreadable presence record");
                return error_badge("Error", 400, Some(&decoration));
            },
        };

        if record.is_stale_at(self.clock.now_millis()) {
            debug!(%public_id, timestamp = record.timestamp, "Presence record is stale");
            return offline_badge(&decoration, options);
        }

        let (label, message, color) = BadgeKind::parse(badge_type).describe(&record);
        metrics::record_badge("live");
        RenderedBadge {
            svg: svg::render(&decorate(label, message, color, &decoration, true)),
            status: 200,
            cache_control: options.cache_control(),
        }
    }
}

/// Builds a badge from defaults, applying overrides. Error badges take only
/// style, logo and link (`full == false`).
fn decorate(
    label: &str,
    message: String,
    color: &str,
    decoration: &Decoration,
    full: bool,
) -> BadgeSpec {
    let default_color = to_svg_color(color).unwrap_or_else(|| color.to_string());
    let (label, label_color, color) = if full {
        (
            decoration.label.clone().unwrap_or_else(|| label.to_string()),
            decoration
                .label_color
                .clone()
                .unwrap_or_else(|| DEFAULT_LABEL_COLOR.to_string()),
            decoration.color.clone().unwrap_or(default_color),
        )
    } else {
        (
            label.to_string(),
            DEFAULT_LABEL_COLOR.to_string(),
            default_color,
        )
    };

    BadgeSpec {
        label,
        message,
        color,
        label_color,
        style: decoration.style,
        logo: decoration.logo.clone(),
        link: decoration.link.clone(),
    }
}

fn offline_badge(decoration: &Decoration, options: &BadgeOptions) -> RenderedBadge {
    metrics::record_badge("offline");
    RenderedBadge {
        svg: svg::render(&decorate(
            "server",
            "offline".to_string(),
            "red",
            decoration,
            true,
        )),
        status: 200,
        cache_control: options.cache_control(),
    }
}

fn error_badge(message: &str, status: u16, decoration: Option<&Decoration>) -> RenderedBadge {
    metrics::record_badge("error");
    let fallback = Decoration::default();
    RenderedBadge {
        svg: svg::render(&decorate(
            "error",
            message.to_string(),
            ERROR_COLOR,
            decoration.unwrap_or(&fallback),
            false,
        )),
        status,
        cache_control: cache_control(Some(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::StoreBackend;
    use async_trait::async_trait;
    use std::time::Duration;

    const ID: &str = "srv_pub_a3a9e1ed9732";
    const NOW: i64 = 1_700_000_000_000;

    fn record_json(age_ms: i64, extra: &str) -> Vec<u8> {
        format!(
            r#"{{"status":"online","players":5,"maxPlayers":20,"tps":19.8,"version":"1.20.1","timestamp":{}{extra}}}"#,
            NOW - age_ms
        )
        .into_bytes()
    }

    async fn renderer_with(value: Option<Vec<u8>>) -> BadgeRenderer {
        let store = PresenceStore::memory();
        if let Some(value) = value {
            store
                .put(ID, &value, Some(Duration::from_secs(300)))
                .await
                .unwrap();
        }
        BadgeRenderer::new(store, Arc::new(FixedClock::new(NOW)))
    }

    async fn render(value: Option<Vec<u8>>, kind: Option<&str>, options: &BadgeOptions) -> RenderedBadge {
        renderer_with(value).await.render(Some(ID), kind, options).await
    }

    struct BrokenBackend;

    #[async_trait]
    impl StoreBackend for BrokenBackend {
        async fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
            anyhow::bail!("connection refused")
        }
        async fn put(&self, _: &str, _: Vec<u8>, _: Option<Duration>) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn delete(&self, _key: &str) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(BadgeKind::parse(None), BadgeKind::Status);
        assert_eq!(BadgeKind::parse(Some("players")), BadgeKind::Players);
        assert_eq!(BadgeKind::parse(Some("uptime")), BadgeKind::Status);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_id() {
        let renderer = renderer_with(None).await;
        let options = BadgeOptions::default();

        let missing = renderer.render(None, None, &options).await;
        assert_eq!(missing.status, 400);
        assert!(missing.svg.contains("error: Missing ID"));
        assert_eq!(missing.cache_control, "no-cache");

        let empty = renderer.render(Some(""), None, &options).await;
        assert!(empty.svg.contains("Missing ID"));

        let invalid = renderer.render(Some("srv_pub_xyz"), None, &options).await;
        assert_eq!(invalid.status, 400);
        assert!(invalid.svg.contains("error: Invalid ID"));
    }

    #[tokio::test]
    async fn test_absent_record_is_offline() {
        let badge = render(None, None, &BadgeOptions::default()).await;
        assert_eq!(badge.status, 200);
        assert!(badge.svg.contains("server: offline"));
        assert!(badge.svg.contains("#e05d44"));
        assert_eq!(badge.cache_control, "public, max-age=60");
    }

    #[tokio::test]
    async fn test_status_badge() {
        let badge = render(Some(record_json(1_000, "")), None, &BadgeOptions::default()).await;
        assert_eq!(badge.status, 200);
        assert!(badge.svg.contains("server: online"));
        assert!(badge.svg.contains("#4c1"));
    }

    #[tokio::test]
    async fn test_non_online_status_is_red() {
        let raw = br#"{"status":"maintenance","players":0,"maxPlayers":20,"tps":20,"version":"1","timestamp":1699999999000}"#;
        let badge = render(Some(raw.to_vec()), Some("status"), &BadgeOptions::default()).await;
        assert!(badge.svg.contains("server: maintenance"));
        assert!(badge.svg.contains("#e05d44"));
    }

    #[tokio::test]
    async fn test_type_badges() {
        let options = BadgeOptions::default();
        let value = || Some(record_json(1_000, ""));

        let players = render(value(), Some("players"), &options).await;
        assert!(players.svg.contains("players: 5/20"));
        assert!(players.svg.contains("#007ec6"));

        let tps = render(value(), Some("tps"), &options).await;
        assert!(tps.svg.contains("tps: 19.8"));
        assert!(tps.svg.contains("#4c1"));

        let version = render(value(), Some("version"), &options).await;
        assert!(version.svg.contains("version: 1.20.1"));

        let software = render(value(), Some("software"), &options).await;
        assert!(software.svg.contains("software: unknown"));
        assert!(software.svg.contains("#9f9f9f"));

        let unknown = render(value(), Some("uptime"), &options).await;
        assert!(unknown.svg.contains("server: online"));
    }

    #[tokio::test]
    async fn test_software_present() {
        let badge = render(
            Some(record_json(1_000, r#","software":"Paper""#)),
            Some("software"),
            &BadgeOptions::default(),
        )
        .await;
        assert!(badge.svg.contains("software: Paper"));
        assert!(badge.svg.contains("blueviolet"));
    }

    #[tokio::test]
    async fn test_blank_software_is_unknown() {
        for software in [r#","software":"""#, r#","software":"   ""#] {
            let badge = render(
                Some(record_json(1_000, software)),
                Some("software"),
                &BadgeOptions::default(),
            )
            .await;
            assert!(badge.svg.contains("software: unknown"), "{software}");
            assert!(badge.svg.contains("#9f9f9f"));
            assert!(!badge.svg.contains("blueviolet"));
        }
    }

    #[tokio::test]
    async fn test_stale_record_is_offline() {
        let badge = render(Some(record_json(300_001, "")), None, &BadgeOptions::default()).await;
        assert!(badge.svg.contains("server: offline"));

        let badge = render(Some(record_json(299_999, "")), None, &BadgeOptions::default()).await;
        assert!(badge.svg.contains("server: online"));
    }

    #[tokio::test]
    async fn test_interval_shortens_staleness() {
        let fresh = render(
            Some(record_json(50_000, r#","heartbeatIntervalSec":10"#)),
            None,
            &BadgeOptions::default(),
        )
        .await;
        assert!(fresh.svg.contains("server: online"));

        let stale = render(
            Some(record_json(61_000, r#","heartbeatIntervalSec":10"#)),
            None,
            &BadgeOptions::default(),
        )
        .await;
        assert!(stale.svg.contains("server: offline"));
    }

    #[tokio::test]
    async fn test_malformed_record_is_error() {
        let badge = render(Some(b"{not json".to_vec()), None, &BadgeOptions::default()).await;
        assert_eq!(badge.status, 400);
        assert!(badge.svg.contains("error: Error"));
        assert_eq!(badge.cache_control, "no-cache");
    }

    #[tokio::test]
    async fn test_storage_failure_is_500() {
        let renderer = BadgeRenderer::new(
            PresenceStore::custom(BrokenBackend),
            Arc::new(FixedClock::new(NOW)),
        );
        let badge = renderer.render(Some(ID), None, &BadgeOptions::default()).await;
        assert_eq!(badge.status, 500);
        assert!(badge.svg.contains("Storage unavailable"));
        assert!(!badge.svg.contains("connection refused"));
        assert_eq!(badge.cache_control, "no-cache");
    }

    #[tokio::test]
    async fn test_overrides_apply_to_live_and_offline() {
        let options = BadgeOptions {
            label: Some("mc".into()),
            color: Some("ff00ff".into()),
            label_color: Some("black".into()),
            style: Some("flat-square".into()),
            ..Default::default()
        };

        for value in [None, Some(record_json(1_000, ""))] {
            let badge = render(value, None, &options).await;
            assert!(badge.svg.contains("<title>mc: "));
            assert!(badge.svg.contains(r##"fill="#ff00ff""##));
            assert!(badge.svg.contains(r#"fill="black""#));
            assert!(badge.svg.contains("crispEdges"));
        }
    }

    #[tokio::test]
    async fn test_error_badge_keeps_label_and_color() {
        let renderer = renderer_with(None).await;
        let options = BadgeOptions {
            label: Some("mc".into()),
            color: Some("blue".into()),
            style: Some("flat-square".into()),
            link: Some("https://example.com".into()),
            ..Default::default()
        };
        let badge = renderer.render(Some("bogus"), None, &options).await;
        assert!(badge.svg.contains("error: Invalid ID"));
        assert!(badge.svg.contains("#e05d44"));
        assert!(!badge.svg.contains("#007ec6"));
        assert!(badge.svg.contains("crispEdges"));
        assert!(badge.svg.contains("https://example.com"));
    }

    #[tokio::test]
    async fn test_unknown_style_is_error_badge() {
        let options = BadgeOptions {
            style: Some("3d".into()),
            ..Default::default()
        };
        let badge = render(Some(record_json(0, "")), None, &options).await;
        assert_eq!(badge.status, 400);
        assert!(badge.svg.contains("error: Error"));
    }

    #[tokio::test]
    async fn test_invalid_color_override_is_ignored() {
        let options = BadgeOptions {
            color: Some("notacolor".into()),
            ..Default::default()
        };
        let badge = render(Some(record_json(0, "")), None, &options).await;
        assert_eq!(badge.status, 200);
        assert!(badge.svg.contains("#4c1"));
    }

    #[tokio::test]
    async fn test_cache_seconds_applies_to_live_badges() {
        let options = BadgeOptions {
            cache_seconds: Some(0),
            ..Default::default()
        };
        let badge = render(Some(record_json(0, "")), None, &options).await;
        assert_eq!(badge.cache_control, "no-cache");

        let options = BadgeOptions {
            cache_seconds: Some(120),
            ..Default::default()
        };
        let badge = render(Some(record_json(0, "")), None, &options).await;
        assert_eq!(badge.cache_control, "public, max-age=120");
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = renderer_with(Some(record_json(1_000, ""))).await;
        let options = BadgeOptions {
            logo: Some("server".into()),
            ..Default::default()
        };
        let first = renderer.render(Some(ID), Some("players"), &options).await;
        let second = renderer.render(Some(ID), Some("players"), &options).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_custom_logo_resolver() {
        struct OneLogo;
        impl LogoResolver for OneLogo {
            fn resolve(&self, name: &str) -> Option<String> {
                (name == "mine").then(|| "M0 0h1v1H0z".to_string())
            }
        }

        let renderer = renderer_with(Some(record_json(0, "")))
            .await
            .with_logos(Arc::new(OneLogo));
        let options = BadgeOptions {
            logo: Some("mine".into()),
            ..Default::default()
        };
        let badge = renderer.render(Some(ID), None, &options).await;
        assert!(badge.svg.contains("<image "));

        let options = BadgeOptions {
            logo: Some("server".into()),
            ..Default::default()
        };
        let badge = renderer.render(Some(ID), None, &options).await;
        assert!(!badge.svg.contains("<image "));
    }
}
