//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/shelfmove/config.toml`
//! - Windows: `%APPDATA%/shelfmove/config.toml`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shelfmove_batch_transfer::TransferConfig;
use shelfmove_protocol::constants::{BATCH_TIMEOUT, REQUEST_TIMEOUT, STREAM_TIMEOUT};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Move Service.
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Timeout for single-shot requests, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Bound on a whole batch, in seconds.
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: u64,

    /// Bound on one streamed transfer, in seconds.
    #[serde(default = "default_stream_timeout")]
    pub stream_timeout_secs: u64,

    /// Move files through the streamed endpoint too.
    #[serde(default)]
    pub stream_files: bool,
}

fn default_service_url() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_request_timeout() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}

fn default_batch_timeout() -> u64 {
    BATCH_TIMEOUT.as_secs()
}

fn default_stream_timeout() -> u64 {
    STREAM_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            request_timeout_secs: default_request_timeout(),
            batch_timeout_secs: default_batch_timeout(),
            stream_timeout_secs: default_stream_timeout(),
            stream_files: false,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from [`config_path`] when none is
    /// given. A missing file is created with the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => config_path()?,
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let config = Config::default();
                config.save_to(&path)?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(config)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Orchestrator settings derived from this configuration.
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig::default()
            .with_batch_timeout(Duration::from_secs(self.batch_timeout_secs))
            .with_stream_timeout(Duration::from_secs(self.stream_timeout_secs))
            .with_stream_files(self.stream_files)
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("shelfmove")
            .join("config.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("shelfmove").join("config.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/shelfmove/config.toml"))
    }
}
