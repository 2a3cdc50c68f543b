//! Configuration management
//!
//! Everything the relay needs at runtime lives in [`RelayConfig`], which is
//! built once in `main` and handed to the router. Nothing below the router
//! reads process environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_RPC_URL: &str = "https://bssc-rpc.bssc.live";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// When the search grounding tool is attached to a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroundingPolicy {
    /// Every query gets grounding, address lookups included.
    #[default]
    Always,
    /// Only queries that are not address-like get grounding.
    FreeformOnly,
}

impl GroundingPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "freeform" => Some(Self::FreeformOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub rpc_url: String,
    pub grounding: GroundingPolicy,
    /// Applied to both outbound clients. `None` leaves calls unbounded.
    pub http_timeout: Option<Duration>,
    pub bind_addr: SocketAddr,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            grounding: GroundingPolicy::default(),
            http_timeout: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl RelayConfig {
    /// Build the config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RelayConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let grounding = match get("RELAY_GROUNDING") {
            Some(value) => GroundingPolicy::parse(&value).ok_or_else(|| ConfigError::Invalid {
                var: "RELAY_GROUNDING",
                value: value.clone(),
                reason: "expected 'always' or 'freeform'".to_string(),
            })?,
            None => GroundingPolicy::default(),
        };

        let http_timeout = match get("RELAY_HTTP_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "RELAY_HTTP_TIMEOUT_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let bind_raw = get("RELAY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "RELAY_BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            // An empty key is allowed; some hosts inject credentials upstream.
            gemini_api_key: lookup("GEMINI_API_KEY").unwrap_or_default(),
            gemini_api_base: get("GEMINI_API_BASE")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            gemini_model: get("GEMINI_MODEL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            rpc_url: get("BSSC_RPC_URL")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            grounding,
            http_timeout,
            bind_addr,
        })
    }
}
