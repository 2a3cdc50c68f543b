//! Error types for the relay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::protocol::ErrorResponse;

pub const GENERIC_FAILURE_MESSAGE: &str = "AI request failed due to a severe server issue.";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    InvalidMethod,

    #[error("Missing query parameter.")]
    MissingQuery,

    /// Body over the size limit, or a body that could not be read.
    #[error("Request body too large.")]
    BodyTooLarge,

    /// The generation API answered with an `error` envelope.
    #[error("Gemini API Error: {0}")]
    Provider(String),

    #[error("Network failure: {0}")]
    Network(String),

    /// A success envelope without `candidates[0].content.parts[0].text`.
    #[error("Malformed response: no candidate text")]
    MalformedResponse,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingQuery => StatusCode::BAD_REQUEST,
            RelayError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Provider(_)
            | RelayError::Network(_)
            | RelayError::MalformedResponse
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response body.
    ///
    /// Only validation and provider errors are echoed; everything else
    /// collapses to one generic message so transport details stay server-side.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::InvalidMethod
            | RelayError::MissingQuery
            | RelayError::BodyTooLarge
            | RelayError::Provider(_) => self.to_string(),
            RelayError::Network(_) | RelayError::MalformedResponse | RelayError::Internal(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

// The request URL carries the API key, so it is stripped before the error
// is stringified.
impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Network(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Network(format!("JSON error: {}", err))
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });
        (self.status(), body).into_response()
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
