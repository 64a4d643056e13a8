//! Service configuration
//!
//! Resolved in layers: built-in defaults, then an optional TOML file, then
//! environment variables and command-line flags (handled by the CLI through
//! [`ConfigOverrides`]).
//!
//! ```toml
//! port = 5000
//! base_url = "https://verifier.example"
//! database_url = "file:///var/lib/idverify"
//! upload_dir = "/var/lib/idverify/uploads"
//! verifier_timeout_secs = 30
//! workers = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::paths;

/// Scheme for directory-backed record storage
const FILE_SCHEME: &str = "file://";

/// Scheme for in-memory record storage
const MEMORY_SCHEME: &str = "memory://";

/// idverify configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the verification provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Record store location (`file://<path>`, a bare path, or `memory://`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Where uploaded documents are written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,
    /// Upper bound on one call to the verification provider
    pub verifier_timeout_secs: u64,
    /// Number of request worker threads
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            base_url: None,
            database_url: None,
            upload_dir: None,
            verifier_timeout_secs: 30,
            workers: 4,
        }
    }
}

/// Values that override the file configuration
///
/// Every field is optional; `None` keeps the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Interface to listen on
    pub host: Option<String>,
    /// Port to listen on
    pub port: Option<u16>,
    /// Provider base URL
    pub base_url: Option<String>,
    /// Record store location
    pub database_url: Option<String>,
    /// Upload directory
    pub upload_dir: Option<PathBuf>,
    /// Provider timeout in seconds
    pub verifier_timeout_secs: Option<u64>,
    /// Worker threads
    pub workers: Option<usize>,
}

/// Where verification records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    /// JSON files under a directory
    File(PathBuf),
    /// Process memory only
    Memory,
}

impl std::str::FromStr for Database {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty database URL".to_string());
        }
        if s == MEMORY_SCHEME || s == "memory" {
            return Ok(Self::Memory);
        }
        if let Some(path) = s.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(format!("Missing path in database URL: {s}"));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if s.contains("://") {
            return Err(format!("Unsupported database URL: {s}. Use file://<path> or memory://"));
        }
        Ok(Self::File(PathBuf::from(s)))
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{FILE_SCHEME}{}", path.display()),
            Self::Memory => write!(f, "{MEMORY_SCHEME}"),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `idverify.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(paths::CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Apply overrides on top of this configuration
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if overrides.base_url.is_some() {
            self.base_url = overrides.base_url;
        }
        if overrides.database_url.is_some() {
            self.database_url = overrides.database_url;
        }
        if overrides.upload_dir.is_some() {
            self.upload_dir = overrides.upload_dir;
        }
        if let Some(secs) = overrides.verifier_timeout_secs {
            self.verifier_timeout_secs = secs;
        }
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        self
    }

    /// Resolved record store location
    pub fn database(&self) -> anyhow::Result<Database> {
        match &self.database_url {
            Some(url) => url.parse().map_err(anyhow::Error::msg),
            None => Ok(Database::File(paths::data_dir())),
        }
    }

    /// Resolved upload directory
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(paths::upload_dir)
    }

    /// Provider base URL, required to serve uploads
    pub fn base_url(&self) -> anyhow::Result<&str> {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("BASE_URL is not set (use --base-url or the BASE_URL environment variable)"))
    }

    /// Timeout for one provider call, at least one second
    #[must_use]
    pub fn verifier_timeout(&self) -> Duration {
        Duration::from_secs(self.verifier_timeout_secs.max(1))
    }

    /// Worker thread count, at least one
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.max(1)
    }

    /// Address to bind the HTTP server to
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
