//! Configuration module for the dashboard.
//!
//! Loads configuration from `config.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use rclone_stats::BaseUnit;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rclone: RcloneConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Connection to the rclone remote-control API (`rclone rcd`)
#[derive(Clone, Deserialize)]
pub struct RcloneConfig {
    #[serde(default = "default_rclone_url")]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Poll `core/stats` in the background. Disable when stats are pushed.
    #[serde(default = "default_poll")]
    pub poll: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Reject payloads with missing required fields instead of showing NaN.
    #[serde(default)]
    pub strict: bool,
}

// Custom Debug implementation to avoid exposing password
impl std::fmt::Debug for RcloneConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RcloneConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("poll", &self.poll)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("strict", &self.strict)
            .finish()
    }
}

impl Default for RcloneConfig {
    fn default() -> Self {
        Self {
            url: default_rclone_url(),
            username: None,
            password: None,
            poll: default_poll(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            strict: false,
        }
    }
}

fn default_rclone_url() -> String {
    "http://127.0.0.1:5572".to_string()
}

fn default_poll() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    10
}

/// Display defaults used until the user stores a preference
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub unit: BaseUnit,
}

/// Where UI preferences are persisted
#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("./data/preferences.json")
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `config.toml` in current directory (optional)
    /// 3. Environment variables with `RWP_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `RWP_SERVER__PORT=9000` sets `server.port`
    /// - `RWP_RCLONE__URL=http://nas:5572` sets `rclone.url`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("rclone.url", "http://127.0.0.1:5572")?
            .set_default("rclone.poll", true)?
            .set_default("rclone.poll_interval_ms", 1000)?
            .set_default("rclone.request_timeout_secs", 10)?
            .set_default("rclone.strict", false)?
            .set_default("display.unit", "bytes")?
            .set_default("preferences.path", "./data/preferences.json")?
            .add_source(File::with_name(config_path).required(false))
            // RWP_RCLONE__URL=http://nas:5572 -> rclone.url
            .add_source(
                Environment::with_prefix("RWP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.rclone.poll && self.rclone.poll_interval_ms == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "rclone.poll_interval_ms must be greater than zero".to_string(),
            )));
        }

        if self.rclone.username.is_some() != self.rclone.password.is_some() {
            tracing::warn!("Only one of rclone username/password is set - requests will not authenticate");
        }

        if !self.rclone.url.starts_with("http://") && !self.rclone.url.starts_with("https://") {
            tracing::warn!(url = %self.rclone.url, "rclone URL has no http(s) scheme");
        }

        Ok(())
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::{IpAddr, Ipv4Addr, SocketAddr};
        let ip: IpAddr = self.server.host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid host '{}', using 0.0.0.0", self.server.host);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.server.port)
    }
}
