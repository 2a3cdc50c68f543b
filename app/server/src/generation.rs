//! Gemini `generateContent` client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::{RelayError, RelayResult};
use crate::prompt::GenerationRequest;

/// Anything that can turn a [`GenerationRequest`] into a decoded response.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> RelayResult<GenerateContentResponse>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn answer(&self) -> RelayResult<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
            .ok_or(RelayError::MalformedResponse)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    error: Option<ProviderErrorBody>,
    #[serde(flatten)]
    body: GenerateContentResponse,
}

/// Decode a raw response body, splitting provider errors from results.
pub fn decode_response(bytes: &[u8]) -> RelayResult<GenerateContentResponse> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if let Some(err) = envelope.error {
        error!(
            "Gemini API Error: code={:?} status={:?} message={}",
            err.code, err.status, err.message
        );
        return Err(RelayError::Provider(err.message));
    }
    Ok(envelope.body)
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, api_base: &str, model: &str, api_key: impl Into<String>) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            model
        );
        info!("GeminiClient using endpoint {}", endpoint);
        Self {
            http,
            endpoint,
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> RelayResult<GenerateContentResponse> {
        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        info!(
            "Gemini responded: status={} size={} bytes",
            status,
            bytes.len()
        );

        decode_response(&bytes)
    }
}
