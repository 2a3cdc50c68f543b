//! Balance lookups against the BSSC JSON-RPC endpoint.
//!
//! BSSC is a Solana fork, so balances come back in lamports
//! (10^9 lamports per token). Lookup failures never escape this module as
//! errors: [`lookup_balance_context`] folds them into a warning that is
//! passed on to the model instead.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

pub const LAMPORTS_PER_TOKEN: u64 = 1_000_000_000;
pub const TOKEN_NAME: &str = "BSSC Testnet Faucet Token";

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("undecodable RPC response: {0}")]
    Decode(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("No result found.")]
    MissingResult,
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        RpcError::Transport(err.without_url().to_string())
    }
}

/// Anything that can report an address balance in lamports.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn get_balance(&self, address: &str) -> Result<u64, RpcError>;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<BalanceResult>,
    // Nodes do not all send an object here.
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    value: Option<u64>,
}

impl RpcResponse {
    fn into_balance(self) -> Result<u64, RpcError> {
        if let Some(err) = self.error {
            let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
            let message = match err.get("message").and_then(|m| m.as_str()) {
                Some(m) => m.to_string(),
                None => match err.as_str() {
                    Some(s) => s.to_string(),
                    None => err.to_string(),
                },
            };
            return Err(RpcError::Rpc { code, message });
        }
        self.result
            .and_then(|r| r.value)
            .ok_or(RpcError::MissingResult)
    }
}

#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        let url = url.into();
        info!("RpcClient using endpoint {}", url);
        Self { http, url }
    }
}

#[async_trait]
impl BalanceSource for RpcClient {
    async fn get_balance(&self, address: &str) -> Result<u64, RpcError> {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "getBalance",
            params: [address],
        };

        let bytes = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .bytes()
            .await?;

        let resp: RpcResponse =
            serde_json::from_slice(&bytes).map_err(|e| RpcError::Decode(e.to_string()))?;
        resp.into_balance()
    }
}

/// Outcome of a balance lookup, rendered into the prompt's context section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceContext {
    Balance { address: String, lamports: u64 },
    RpcFailed,
    NetworkFailed(String),
}

impl fmt::Display for BalanceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceContext::Balance { address, lamports } => write!(
                f,
                "RPC Data: The current BSSC balance for address {} is {} {}.",
                address,
                format_lamports(*lamports),
                TOKEN_NAME
            ),
            BalanceContext::RpcFailed => write!(
                f,
                "Warning: RPC call to BSSC endpoint failed. No live balance data available."
            ),
            BalanceContext::NetworkFailed(msg) => write!(
                f,
                "Warning: Critical network error during server-side RPC fetch: {}.",
                msg
            ),
        }
    }
}

/// Look up `address` once and describe the outcome. Never fails.
pub async fn lookup_balance_context(source: &dyn BalanceSource, address: &str) -> BalanceContext {
    match source.get_balance(address).await {
        Ok(lamports) => {
            info!("Balance lookup OK: address={} lamports={}", address, lamports);
            BalanceContext::Balance {
                address: address.to_string(),
                lamports,
            }
        }
        Err(e @ (RpcError::Rpc { .. } | RpcError::MissingResult)) => {
            warn!("RPC call failed for {}: {}", address, e);
            BalanceContext::RpcFailed
        }
        Err(e) => {
            error!("Server-side RPC fetch error for {}: {}", address, e);
            BalanceContext::NetworkFailed(e.to_string())
        }
    }
}

/// Exact decimal rendering of a lamport amount in whole tokens.
pub fn format_lamports(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_TOKEN;
    let frac = lamports % LAMPORTS_PER_TOKEN;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:09}", frac);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
