use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bssc_relay::config::RelayConfig;
use bssc_relay::relay::{self, AppState};

/// BSSC AI Explorer relay
///
/// Serves the browser UI and the `/api/analyze` relay that forwards queries
/// to Gemini, with a balance lookup for address-like queries.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal outside local development.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("BSSC relay starting...");
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = RelayConfig::from_env().context("Invalid configuration")?;
    if config.gemini_api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; generation requests will rely on upstream credentials");
    }
    info!(
        "Model={} rpc={} grounding={:?} timeout={:?}",
        config.gemini_model, config.rpc_url, config.grounding, config.http_timeout
    );

    let state = AppState::from_config(&config).context("Failed to build HTTP clients")?;
    let app = relay::router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}
