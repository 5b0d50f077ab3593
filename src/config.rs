//! Configuration types for the pulse server.
//!
//! Loaded from a TOML file (`pulse.toml` by default):
//!
//! - [`Config`] - Root configuration struct
//! - [`ServerConfig`] - HTTP listener settings
//! - [`StoreConfig`] - Presence store backend selection
//! - [`LoggingConfig`] - Log level and output format
//!
//! Every field has a default, so an absent file yields a working in-memory
//! server on port 8787.
//!
//! ```toml
//! [server]
//! addr = "0.0.0.0:8787"
//!
//! [store]
//! backend = "redis"
//! url = "redis://127.0.0.1/"
//! namespace = "pulse"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// pulse.toml configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: constants::DEFAULT_ADDR.to_string(),
        }
    }
}

/// Which presence backend to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process memory (single instance, lost on restart)
    #[default]
    Memory,
    /// Embedded redb database file
    Redb,
    /// Redis-compatible server
    Redis,
    /// One file per key in a directory
    Blob,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redb => "redb",
            Self::Redis => "redis",
            Self::Blob => "blob",
        }
    }
}

/// Presence store backend selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// redb database file or blob directory. Defaults under the user data dir.
    pub path: Option<PathBuf>,
    /// Redis connection URL.
    pub url: Option<String>,
    /// Key prefix (Redis) or subdirectory (blob) shared stores are split by.
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: None,
            url: None,
            namespace: constants::DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Database file for the redb backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the platform data
    /// directory cannot be determined.
    pub fn redb_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("presence.redb")),
        }
    }

    /// Directory for the blob backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the platform data
    /// directory cannot be determined.
    pub fn blob_dir(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("blobs").join(&self.namespace)),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Log level and output format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// `<platform data dir>/pulse`
fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("pulse"))
        .context("Could not determine the data directory; set store.path explicitly")
}

impl Config {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types or unknown names
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load an explicitly given file, or `pulse.toml` if it exists, or
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let default_path = Path::new(constants::DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load_from(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Listen address parsed from `server.addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not `host:port`.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server
            .addr
            .parse()
            .with_context(|| format!("Invalid server.addr '{}'", self.server.addr))
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error listing every problem found:
    /// - Unparseable listen address or port 0
    /// - Redis backend without `store.url`
    /// - Empty namespace
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match self.listen_addr() {
            Ok(addr) if addr.port() == 0 => {
                errors.push("server.addr port cannot be 0".to_string());
            },
            Ok(_) => {},
            Err(e) => errors.push(format!("{e:#}")),
        }

        if self.store.namespace.trim().is_empty() {
            errors.push("store.namespace cannot be empty".to_string());
        }

        match self.store.backend {
            BackendKind::Redis => {
                if self.store.url.as_deref().is_none_or(str::is_empty) {
                    errors.push("store.url is required when store.backend = \"redis\"".to_string());
                }
                if self.store.path.is_some() {
                    warnings.push("store.path is ignored by the redis backend".to_string());
                }
            },
            BackendKind::Memory => {
                warnings.push(
                    "store.backend = \"memory\": presence data is lost on restart and not \
                     shared between instances"
                        .to_string(),
                );
            },
            BackendKind::Redb | BackendKind::Blob => {
                if self.store.url.is_some() {
                    warnings.push(format!(
                        "store.url is ignored by the {} backend",
                        self.store.backend.as_str()
                    ));
                }
            },
        }

        if !errors.is_empty() {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "));
        }

        Ok(ValidationResult { warnings })
    }
}
