//! Generation request assembly
//!
//! Wire types for the `generateContent` request body and the function that
//! fills them in from a query and its balance context.

use serde::Serialize;

use crate::classify::Classification;
use crate::config::GroundingPolicy;

pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant specialized in the BSSC blockchain.
1. The BSSC network is a fork built on the **Solana blockchain**.
2. The native token used is the **BSSC Testnet Faucet Token** (used only for testing and has **no real-world monetary value**).
3. Your primary goal is to **analyze the provided data** (either RPC balance data or context from Google Search) and the user's query, and **explain the information in simple, non-technical words**.
4. **Crucially:** If RPC data is available in the Internal Context, clearly state the balance. If it's not an address or RPC failed, use Google Search to provide general context about BSSC or the transaction hash.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Empty marker object; serializes as `{}`.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

impl GenerationRequest {
    pub fn grounded(&self) -> bool {
        self.tools.is_some()
    }
}

pub fn grounding_enabled(policy: GroundingPolicy, classification: Classification) -> bool {
    match policy {
        GroundingPolicy::Always => true,
        GroundingPolicy::FreeformOnly => !classification.is_address(),
    }
}

pub fn user_prompt(query: &str, context: &str) -> String {
    format!("User Query: {}\n\nInternal Context: {}", query, context)
}

pub fn build_request(query: &str, context: &str, grounding: bool) -> GenerationRequest {
    GenerationRequest {
        contents: vec![Content::text(user_prompt(query, context))],
        system_instruction: Content::text(SYSTEM_INSTRUCTION),
        tools: grounding.then(|| {
            vec![Tool {
                google_search: GoogleSearch::default(),
            }]
        }),
    }
}
