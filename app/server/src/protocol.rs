use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyze`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub query: Option<String>,
}

impl AnalyzeRequest {
    /// Parse a raw body, returning the trimmed query when one is present.
    ///
    /// Unparsable bodies, a non-string `query` and blank queries all yield
    /// `None`.
    pub fn query_from_body(body: &[u8]) -> Option<String> {
        let req: AnalyzeRequest = serde_json::from_slice(body).ok()?;
        req.query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
