//! Client configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/dahouse/desktop.toml`
//! - Windows: `%APPDATA%/dahouse/desktop.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use dahouse_orchestrator::Locale;
use dahouse_session::ApiConfig;
use dahouse_updates::{UpdateConfig, VersionOrdering};
use serde::{Deserialize, Serialize};

/// File name of the saved-credentials record.
const CREDENTIALS_FILE: &str = "dahouse_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the DAHOUSE API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Latest-release metadata endpoint.
    #[serde(default = "default_release_url")]
    pub release_url: String,

    /// Saved-credentials file. Empty means next to this config file.
    #[serde(default)]
    pub credentials_path: String,

    #[serde(default)]
    pub locale: Locale,

    #[serde(default)]
    pub version_ordering: VersionOrdering,

    /// Timeout applied to every HTTP request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Show the login window at startup instead of waiting for Open.
    #[serde(default = "default_true")]
    pub open_on_start: bool,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_release_url() -> String {
    UpdateConfig::new(env!("CARGO_PKG_VERSION")).release_url
}

fn default_request_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            release_url: default_release_url(),
            credentials_path: String::new(),
            locale: Locale::default(),
            version_ordering: VersionOrdering::default(),
            request_timeout_secs: default_request_timeout(),
            open_on_start: default_true(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Writes the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Location of the saved-credentials record for a config read from
    /// `config_file`.
    pub fn credentials_file(&self, config_file: &Path) -> PathBuf {
        if !self.credentials_path.is_empty() {
            return PathBuf::from(&self.credentials_path);
        }
        config_file
            .parent()
            .map(|dir| dir.join(CREDENTIALS_FILE))
            .unwrap_or_else(|| PathBuf::from(CREDENTIALS_FILE))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            timeout: self.request_timeout(),
        }
    }

    pub fn update_config(&self, current_version: &str) -> UpdateConfig {
        UpdateConfig {
            release_url: self.release_url.clone(),
            ordering: self.version_ordering,
            timeout: self.request_timeout(),
            ..UpdateConfig::new(current_version)
        }
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("dahouse")
            .join("desktop.toml")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("dahouse").join("desktop.toml")
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("/tmp/dahouse/desktop.toml")
    }
}
