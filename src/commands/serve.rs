//! `pulse serve` - run the HTTP server.
//!
//! Configuration comes from `pulse.toml` (or `--config`), then flags and
//! `PULSE_*` environment variables override individual fields.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pulse::badge::BadgeRenderer;
use pulse::clock::{Clock, SystemClock};
use pulse::config::{BackendKind, Config};
use pulse::heartbeat::HeartbeatIngestor;
use pulse::http::{self, AppState};
use pulse::store::PresenceStore;
use pulse::{logging, metrics};

/// Flags for `pulse serve`.
#[derive(Debug, Default, clap::Args)]
pub struct ServeArgs {
    /// Configuration file (default: ./pulse.toml if present)
    #[arg(long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8787
    #[arg(long, env = "PULSE_ADDR")]
    pub addr: Option<String>,

    /// Presence store backend
    #[arg(long, value_enum, env = "PULSE_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Redis connection URL (redis backend)
    #[arg(long, env = "PULSE_REDIS_URL")]
    pub redis_url: Option<String>,

    /// Data directory for the redb and blob backends
    #[arg(long, env = "PULSE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Applies command-line overrides to a loaded configuration.
fn apply_overrides(config: &mut Config, args: &ServeArgs) {
    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
    }
    if let Some(backend) = args.backend {
        config.store.backend = backend;
    }
    if let Some(url) = &args.redis_url {
        config.store.url = Some(url.clone());
    }
    if let Some(dir) = &args.data_dir {
        match config.store.backend {
            BackendKind::Redb => config.store.path = Some(dir.join("presence.redb")),
            BackendKind::Blob => {
                config.store.path = Some(dir.join("blobs").join(&config.store.namespace));
            },
            BackendKind::Memory | BackendKind::Redis => {},
        }
    }
}

/// Run the server until Ctrl+C.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    logging::init(&config.logging)?;

    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let addr = config.listen_addr()?;
    let store = PresenceStore::from_config(&config.store).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let metrics = match metrics::install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Metrics disabled");
            None
        },
    };

    let state = AppState {
        ingestor: HeartbeatIngestor::new(store.clone(), Arc::clone(&clock)),
        renderer: BadgeRenderer::new(store.clone(), Arc::clone(&clock)),
        clock,
        metrics,
    };

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        backend = store.backend_name(),
        version = env!("CARGO_PKG_VERSION"),
        "pulse listening"
    );

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let mut config = Config::default();
        let args = ServeArgs {
            addr: Some("127.0.0.1:9999".into()),
            backend: Some(BackendKind::Redis),
            redis_url: Some("redis://localhost/".into()),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);

        assert_eq!(config.server.addr, "127.0.0.1:9999");
        assert_eq!(config.store.backend, BackendKind::Redis);
        assert_eq!(config.store.url.as_deref(), Some("redis://localhost/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_data_dir_per_backend() {
        let mut config = Config::default();
        let args = ServeArgs {
            backend: Some(BackendKind::Blob),
            data_dir: Some(PathBuf::from("/srv/pulse")),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(
            config.store.path,
            Some(PathBuf::from("/srv/pulse/blobs/pulse"))
        );

        let mut config = Config::default();
        let args = ServeArgs {
            backend: Some(BackendKind::Redb),
            data_dir: Some(PathBuf::from("/srv/pulse")),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(
            config.store.path,
            Some(PathBuf::from("/srv/pulse/presence.redb"))
        );
    }
}
