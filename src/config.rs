//! Process configuration and shared application state
//!
//! Configuration is read once at startup from environment variables and is never
//! mutated afterwards. Handlers and middleware see it through [`AppState`].

use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::extractor::Extractor;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BINARY: &str = "yt-dlp";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must be a boolean, got {value:?}")]
    InvalidBool { name: &'static str, value: String },
}

/// Immutable service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API keys accepted by the request gate
    ///
    /// An empty set rejects every request.
    pub allowed_api_keys: HashSet<String>,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Executable used for extraction (`YT_DLP_BIN`)
    pub extractor_binary: String,

    /// Upper bound for a single extraction call
    pub extract_timeout: Duration,

    /// Whether the request logger middleware is installed
    pub log_requests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_api_keys: HashSet::new(),
            port: DEFAULT_PORT,
            extractor_binary: DEFAULT_BINARY.to_string(),
            extract_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_requests: true,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment
    ///
    /// # Environment Variables
    ///
    /// - `ALLOW_API_KEYS` - Comma-separated list of accepted API keys
    /// - `PORT` - Server port number (default: 8080)
    /// - `YT_DLP_BIN` - Extraction executable (default: "yt-dlp")
    /// - `EXTRACT_TIMEOUT_SECS` - Extraction timeout in seconds (default: 30)
    /// - `LOG_REQUESTS` - Enable the request logger (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let allowed_api_keys = lookup("ALLOW_API_KEYS")
            .map(|raw| parse_api_keys(&raw))
            .unwrap_or_default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                name: "PORT",
                value,
            })?,
            None => defaults.port,
        };

        let extractor_binary = lookup("YT_DLP_BIN")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.extractor_binary);

        let extract_timeout = match lookup("EXTRACT_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().ok().filter(|secs| *secs > 0);
                match secs {
                    Some(secs) => Duration::from_secs(secs),
                    None => {
                        return Err(ConfigError::InvalidTimeout {
                            name: "EXTRACT_TIMEOUT_SECS",
                            value,
                        })
                    }
                }
            }
            None => defaults.extract_timeout,
        };

        let log_requests = match lookup("LOG_REQUESTS") {
            Some(value) => match parse_bool(&value) {
                Some(enabled) => enabled,
                None => {
                    return Err(ConfigError::InvalidBool {
                        name: "LOG_REQUESTS",
                        value,
                    })
                }
            },
            None => defaults.log_requests,
        };

        Ok(Self {
            allowed_api_keys,
            port,
            extractor_binary,
            extract_timeout,
            log_requests,
        })
    }

    /// Returns true if `key` is in the allow-list
    pub fn is_allowed_key(&self, key: &str) -> bool {
        self.allowed_api_keys.contains(key)
    }
}

fn parse_api_keys(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Application state shared across all request handlers
///
/// Both members are behind `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<Config>,

    /// Extraction engine adapter
    pub extractor: Arc<dyn Extractor>,
}

impl AppState {
    pub fn new(config: Config, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            config: Arc::new(config),
            extractor,
        }
    }
}
