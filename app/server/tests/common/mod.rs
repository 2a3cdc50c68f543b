#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bssc_relay::error::RelayResult;
use bssc_relay::generation::{decode_response, GenerateContentResponse, Generator};
use bssc_relay::prompt::GenerationRequest;
use bssc_relay::rpc::{BalanceSource, RpcError};
use tower::ServiceExt;

/// 32 base58 characters, classified as address-like.
pub const ADDRESS: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7";

pub struct FakeBalances {
    calls: AtomicUsize,
    reply: fn() -> Result<u64, RpcError>,
}

impl FakeBalances {
    pub fn new(reply: fn() -> Result<u64, RpcError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for FakeBalances {
    async fn get_balance(&self, _address: &str) -> Result<u64, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

type Reply = Box<dyn Fn(&GenerationRequest) -> RelayResult<GenerateContentResponse> + Send + Sync>;

pub struct FakeGenerator {
    calls: AtomicUsize,
    last: Mutex<Option<GenerationRequest>>,
    reply: Reply,
}

impl FakeGenerator {
    pub fn new<F>(reply: F) -> Arc<Self>
    where
        F: Fn(&GenerationRequest) -> RelayResult<GenerateContentResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            reply: Box::new(reply),
        })
    }

    /// Replies with a fixed raw response body.
    pub fn with_body(body: &'static str) -> Arc<Self> {
        Self::new(move |_| decode_response(body.as_bytes()))
    }

    /// Replies with the prompt text it was given.
    pub fn echo() -> Arc<Self> {
        Self::new(|req| {
            let prompt = &req.contents[0].parts[0].text;
            let body = serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": prompt }] } }]
            });
            decode_response(body.to_string().as_bytes())
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> String {
        self.last_request()
            .map(|r| r.contents[0].parts[0].text.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> RelayResult<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        (self.reply)(request)
    }
}

pub async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn send_json(app: Router, method: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(app, method, "/api/analyze", body).await;
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}
