//! Configuration loading and constants.
//!
//! Every setting has a default equal to the fixed value a test harness expects
//! (port 8090, `/v1/input`, a `Testing...` line every two seconds), so the
//! binary behaves identically with or without a configuration file. A TOML file
//! passed via `--config` can override any subset of fields.

use const_format::formatcp;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

// =============================================================================
// HTTP Responder
// =============================================================================

/// Default listen host (all interfaces)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 8090;

/// The single route the responder answers
pub const INPUT_ROUTE: &str = "/v1/input";

// =============================================================================
// Log Writer
// =============================================================================

/// Default heartbeat file, the CI checkout location the harness tails
pub const DEFAULT_HEARTBEAT_PATH: &str = "/home/circleci/project/test/test.log";

/// Seconds between heartbeat writes
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 2;

/// Line appended on every tick, newline included
pub const DEFAULT_HEARTBEAT_LINE: &str = "Testing...\n";

/// Permission bits for a newly created heartbeat file (unix only)
pub const HEARTBEAT_FILE_MODE: u32 = 0o644;

// =============================================================================
// Logging and Defaults
// =============================================================================

/// Crate name used as the tracing target prefix
const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info", CRATE_NAME);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP responder configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Heartbeat log writer configuration
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Heartbeat writer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatConfig {
    /// File the heartbeat line is appended to
    #[serde(default = "HeartbeatConfig::default_path")]
    pub path: PathBuf,
    /// Delay between writes in seconds
    #[serde(default = "HeartbeatConfig::default_interval")]
    pub interval_seconds: u64,
    /// Literal text written on every tick
    #[serde(default = "HeartbeatConfig::default_line")]
    pub line: String,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            interval_seconds: Self::default_interval(),
            line: Self::default_line(),
        }
    }
}

impl HeartbeatConfig {
    fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_HEARTBEAT_PATH)
    }

    fn default_interval() -> u64 {
        DEFAULT_HEARTBEAT_INTERVAL_SECS
    }

    fn default_line() -> String {
        DEFAULT_HEARTBEAT_LINE.to_string()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat.interval_seconds == 0 {
            return Err(ConfigError::Validation(
                "heartbeat.interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.heartbeat.line.is_empty() {
            return Err(ConfigError::Validation(
                "heartbeat.line must not be empty".to_string(),
            ));
        }
        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }

    /// Socket address the responder listens on.
    ///
    /// `http.host` may be an IPv4 or IPv6 literal or a hostname; hostnames
    /// are resolved once here and the first address is used.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.http.host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.http.port));
        }

        (host, self.http.port)
            .to_socket_addrs()
            .map_err(|e| {
                ConfigError::Validation(format!("Invalid http.host \"{}\": {}", self.http.host, e))
            })?
            .next()
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "http.host \"{}\" did not resolve to any address",
                    self.http.host
                ))
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
