//! HTTP entry point for the query relay.
//!
//! A request moves through validation, classification, an optional balance
//! lookup, prompt assembly and dispatch, and ends in exactly one JSON
//! response: `{"answer": ..}` on success or `{"error": ..}` otherwise.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::classify::classify;
use crate::config::{GroundingPolicy, RelayConfig};
use crate::error::{RelayError, RelayResult};
use crate::generation::{GeminiClient, Generator};
use crate::prompt::{build_request, grounding_enabled};
use crate::protocol::{AnalyzeRequest, AnalyzeResponse};
use crate::rpc::{lookup_balance_context, BalanceSource, RpcClient};
use crate::ui;

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const FALLBACK_ANSWER: &str = "No response from the model.";
/// Largest accepted `/api/analyze` body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared, read-only state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub grounding: GroundingPolicy,
    pub balances: Arc<dyn BalanceSource>,
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(
        grounding: GroundingPolicy,
        balances: Arc<dyn BalanceSource>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            grounding,
            balances,
            generator,
        }
    }

    /// Wire the real RPC and Gemini clients from `config`.
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let rpc = RpcClient::new(http.clone(), config.rpc_url.clone());
        let gemini = GeminiClient::new(
            http,
            &config.gemini_api_base,
            &config.gemini_model,
            config.gemini_api_key.clone(),
        );

        Ok(Self::new(config.grounding, Arc::new(rpc), Arc::new(gemini)))
    }
}

/// Processing stages, used to label log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Classifying,
    FetchingBalance,
    AssemblingPrompt,
    Dispatching,
    RespondingSuccess,
    RespondingError,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Classifying => "classifying",
            Stage::FetchingBalance => "fetching_balance",
            Stage::AssemblingPrompt => "assembling_prompt",
            Stage::Dispatching => "dispatching",
            Stage::RespondingSuccess => "responding_success",
            Stage::RespondingError => "responding_error",
        };
        f.write_str(name)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route(
            "/health",
            get(|| async {
                info!("HTTP GET /health request received");
                (StatusCode::OK, "OK")
            }),
        )
        .route(ANALYZE_PATH, any(analyze))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn analyze(State(state): State<AppState>, method: Method, request: Request) -> Response {
    let result = match read_body(&method, request).await {
        Ok(body) => relay_query(&state, &method, &body).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(answer) => {
            info!(stage = %Stage::RespondingSuccess, "Sending answer: size={} bytes", answer.len());
            (StatusCode::OK, Json(AnalyzeResponse { answer })).into_response()
        }
        Err(e) => {
            warn!(stage = %Stage::RespondingError, status = %e.status(), "Relay failed: {}", e);
            e.into_response()
        }
    }
}

/// Buffer the body, but only for POST and only up to [`MAX_BODY_BYTES`].
async fn read_body(method: &Method, request: Request) -> RelayResult<Bytes> {
    if *method != Method::POST {
        return Err(RelayError::InvalidMethod);
    }
    axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            warn!(stage = %Stage::Validating, "Failed to read request body: {}", e);
            RelayError::BodyTooLarge
        })
}

/// Run one query through the relay and return the answer text.
pub async fn relay_query(state: &AppState, method: &Method, body: &[u8]) -> RelayResult<String> {
    info!(stage = %Stage::Validating, "HTTP {} {} request received", method, ANALYZE_PATH);
    if *method != Method::POST {
        return Err(RelayError::InvalidMethod);
    }
    let query = AnalyzeRequest::query_from_body(body).ok_or(RelayError::MissingQuery)?;

    let classification = classify(&query);
    info!(stage = %Stage::Classifying, "Query classified: {:?} query={}", classification, query);

    let context = if classification.is_address() {
        info!(stage = %Stage::FetchingBalance, "Looking up balance for {}", query);
        lookup_balance_context(state.balances.as_ref(), &query)
            .await
            .to_string()
    } else {
        String::new()
    };

    let grounding = grounding_enabled(state.grounding, classification);
    let request = build_request(&query, &context, grounding);
    info!(
        stage = %Stage::AssemblingPrompt,
        "Prompt assembled: grounding={} context_len={}",
        request.grounded(),
        context.len()
    );

    info!(stage = %Stage::Dispatching, "Dispatching generation request");
    let response = state.generator.generate(&request).await?;

    match response.answer() {
        Ok(text) => Ok(text.to_string()),
        Err(RelayError::MalformedResponse) => {
            warn!("Generation response had no candidate text; using fallback answer");
            Ok(FALLBACK_ANSWER.to_string())
        }
        Err(e) => Err(e),
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);
    RelayError::Internal(detail).into_response()
}
